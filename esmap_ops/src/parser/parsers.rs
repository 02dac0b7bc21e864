use crate::parser::Import;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_until};
use nom::character::complete::{char, multispace0};
use nom::combinator::opt;
use nom::error::ErrorKind;
use nom::sequence::{delimited, terminated, tuple};
use nom::IResult;
use regex::Regex;
use std::sync::OnceLock;

pub fn all_possible_import_types(content: &str) -> IResult<&str, Import> {
  alt((
    parse_import_promise,
    parse_side_effect_import,
    parse_import_statement,
    parse_export_from,
  ))(content)
}

fn only_contains_types(meat: &str) -> bool {
  static TYPE_ONLY: OnceLock<Option<Regex>> = OnceLock::new();
  let type_only = TYPE_ONLY.get_or_init(|| Regex::new(r#"^\{\s*(type\s+\w+,?\s*)+\}\s*$"#).ok());

  meat.starts_with("type ")
    || meat.starts_with("type{")
    || type_only
      .as_ref()
      .map(|regex| regex.is_match(meat))
      .unwrap_or(false)
}

fn parse_import_statement(module_contents: &str) -> IResult<&str, Import> {
  let from = delimited(multispace0, tag("from"), multispace0);
  let import = terminated(tag("import"), multispace0);
  let (next, output) = tuple((import, take_until("from"), from, path_string))(module_contents)?;

  let (_import_text, meat, _from, path) = output;
  if ends_a_statement(meat) || only_contains_types(meat) {
    return Err(nom::Err::Error(nom::error::Error::new(
      next,
      ErrorKind::Fail,
    )));
  }

  Ok((next, Import::Import(path)))
}

fn parse_side_effect_import(module_contents: &str) -> IResult<&str, Import> {
  let import = terminated(tag("import"), multispace0);
  let (next, (_, path)) = tuple((import, path_string))(module_contents)?;

  Ok((next, Import::Import(path)))
}

fn parse_import_promise(module_contents: &str) -> IResult<&str, Import> {
  let open = terminated(tag("import("), multispace0);
  let close = delimited(multispace0, char(')'), multispace0);
  let (next, output) = delimited(open, path_string, close)(module_contents)?;

  Ok((next, Import::AsyncImport(output)))
}

fn parse_export_from(module_contents: &str) -> IResult<&str, Import> {
  let from = delimited(multispace0, tag("from"), multispace0);
  let export = terminated(tag("export"), multispace0);
  let (next, output) = tuple((export, take_until("from"), from, path_string))(module_contents)?;

  let (_, meat, _, path) = output;
  if ends_a_statement(meat) || only_contains_types(meat) {
    return Err(nom::Err::Error(nom::error::Error::new(
      next,
      ErrorKind::Fail,
    )));
  }
  Ok((next, Import::ExportFrom(path)))
}

// a `from` past a `;` belongs to a later statement
fn ends_a_statement(meat: &str) -> bool {
  meat.contains(';')
}

// an empty specifier parses so the caller can report it
fn path_string(input: &str) -> IResult<&str, String> {
  let (next, output) = alt((
    delimited(char('\''), opt(is_not("'\n")), char('\'')),
    delimited(char('"'), opt(is_not("\"\n")), char('"')),
  ))(input)?;

  Ok((next, output.unwrap_or_default().to_string()))
}
