use crate::parser::parsers::all_possible_import_types;
mod parsers;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty module specifier at offset {offset}")]
    EmptySpecifier { offset: usize },
}

#[derive(Debug, Clone, PartialOrd, PartialEq, Eq)]
pub enum Import {
    Import(String),
    ExportFrom(String),
    AsyncImport(String),
}

impl AsRef<str> for Import {
    fn as_ref(&self) -> &str {
        match self {
            Import::Import(s) => s,
            Import::ExportFrom(s) => s,
            Import::AsyncImport(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialOrd, PartialEq, Eq)]
#[repr(transparent)]
pub struct UnresolvedImport(pub Import);

impl AsRef<str> for UnresolvedImport {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl UnresolvedImport {
    pub fn import_kind(&self) -> &Import {
        &self.0
    }

    pub fn specifier(&self) -> &str {
        self.0.as_ref()
    }

    /// `import()` expressions are resolved when reached at run time, not while
    /// linking.
    pub fn is_dynamic(&self) -> bool {
        matches!(self.0, Import::AsyncImport(_))
    }

    /// Scans module source for import and re-export statements, in source order.
    /// Text that is not an import is skipped a character at a time.
    pub fn parse_many(module_contents: impl AsRef<str>) -> Result<Vec<Self>, ParseError> {
        let contents = module_contents.as_ref();
        let mut rest = contents;
        let mut output = vec![];

        loop {
            match all_possible_import_types(rest) {
                Ok((remaining, out)) => {
                    if out.as_ref().is_empty() {
                        return Err(ParseError::EmptySpecifier {
                            offset: contents.len() - rest.len(),
                        });
                    }
                    output.push(UnresolvedImport(out));
                    rest = remaining;
                }
                Err(_) => {
                    let mut chars = rest.chars();
                    if chars.next().is_none() {
                        break;
                    }
                    rest = chars.as_str();
                }
            }
        }

        Ok(output)
    }
}
