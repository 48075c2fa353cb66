//! A terminal transcript of directory navigation and listings.
//!
//! ```text
//! $ cd /
//! $ ls
//! dir a
//! 14848514 b.txt
//! $ cd a
//! $ ls
//! 584 i
//! ```
//!
//! Nothing is left on the stack. The grammar tracks the working directory in
//! the context under [`CWD`] and stores each listing under
//! `dir:<absolute path>` as a list of `Dir`/`File` records.

use std::collections::BTreeMap;

use crate::combinators::{list, one_of, one_or_more, optional, sequence_of};
use crate::driver::parse_till_end;
use crate::errors::ParseError;
use crate::matchers::{char_silent, line_end, literal_silent, long, space, word};
use crate::parser::Parser;
use crate::record::{to_record, FieldSpec, RecordShape};
use crate::state::{Context, ParseState};
use crate::value::{Value, ValueType};

/// Context key of the working directory, a list of path segments.
pub const CWD: &str = "cwd";

/// Context key prefix of directory listings.
pub const LISTING_PREFIX: &str = "dir:";

pub fn dir_shape() -> RecordShape {
    RecordShape::new("Dir", vec![FieldSpec::required("name", ValueType::Str)])
}

pub fn file_shape() -> RecordShape {
    RecordShape::new(
        "File",
        vec![
            FieldSpec::required("size", ValueType::Long),
            FieldSpec::required("name", ValueType::Str),
        ],
    )
}

fn render_path(segments: &[Value]) -> String {
    let names: Vec<&str> = segments.iter().filter_map(Value::as_str).collect();
    format!("/{}", names.join("/"))
}

fn working_directory(state: &ParseState) -> Result<Vec<Value>, ParseError> {
    match state.context_value(CWD) {
        Some(Value::List(segments)) => Ok(segments.clone()),
        Some(other) => Err(ParseError::custom(format!(
            "Expected working directory to be a list but got: {}",
            other.type_name()
        ))),
        None => Err(ParseError::custom(
            "No working directory yet; the transcript must start with `cd /`",
        )),
    }
}

/// `cd <name>`; `/` resets to the root and `..` moves up one level.
pub fn change_directory() -> Parser {
    let inner = sequence_of([literal_silent("cd"), space(), word(), optional(line_end())]);
    Parser::new(
        format!("change_directory({})", inner.label()),
        move |state: ParseState| {
            let mut next = inner.parse(state);
            if next.is_failed() {
                return next;
            }
            let target = match next.pop_last() {
                Some(Value::Str(target)) => target,
                other => {
                    let found = other.as_ref().map_or("nothing", Value::type_name);
                    return next.fail(ParseError::custom(format!(
                        "Expected directory name to be a string but got: {}",
                        found
                    )));
                }
            };

            let segments = match target.as_str() {
                "/" => Vec::new(),
                ".." => match working_directory(&next) {
                    Ok(mut segments) => {
                        if segments.pop().is_none() {
                            return next.fail(ParseError::custom(
                                "Cannot move above the root directory",
                            ));
                        }
                        segments
                    }
                    Err(error) => return next.fail(error),
                },
                name => match working_directory(&next) {
                    Ok(mut segments) => {
                        segments.push(Value::from(name));
                        segments
                    }
                    Err(error) => return next.fail(error),
                },
            };
            next.set_context(CWD, segments);
            next
        },
    )
}

fn entry() -> Parser {
    one_of([
        to_record(
            dir_shape(),
            sequence_of([literal_silent("dir "), word(), optional(line_end())]),
        ),
        to_record(
            file_shape(),
            sequence_of([long(), space(), word(), optional(line_end())]),
        ),
    ])
}

/// `ls` followed by its listing; the entries are filed under the working
/// directory.
pub fn list_directory() -> Parser {
    let inner = sequence_of([literal_silent("ls"), line_end(), list(one_or_more(entry()))]);
    Parser::new(
        format!("list_directory({})", inner.label()),
        move |state: ParseState| {
            let mut next = inner.parse(state);
            if next.is_failed() {
                return next;
            }
            let segments = match working_directory(&next) {
                Ok(segments) => segments,
                Err(error) => return next.fail(error),
            };
            match next.pop_last() {
                Some(entries @ Value::List(_)) => {
                    let key = format!("{}{}", LISTING_PREFIX, render_path(&segments));
                    next.set_context(key, entries);
                    next
                }
                other => {
                    let found = other.as_ref().map_or("nothing", Value::type_name);
                    next.fail(ParseError::custom(format!(
                        "Expected listing to be a list but got: {}",
                        found
                    )))
                }
            }
        },
    )
}

pub fn command() -> Parser {
    sequence_of([
        char_silent('$'),
        space(),
        one_of([change_directory(), list_directory()]),
    ])
}

pub fn grammar() -> Parser {
    parse_till_end(command())
}

/// Total size of every listed directory, files of nested directories
/// included. Keys are absolute paths.
pub fn directory_sizes(context: &Context) -> BTreeMap<String, i64> {
    let mut sizes = BTreeMap::new();
    for (key, listing) in context.iter() {
        let Some(path) = key.strip_prefix(LISTING_PREFIX) else {
            continue;
        };
        let direct: i64 = listing
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_record)
            .filter_map(|entry| entry.get("size").and_then(Value::as_long))
            .sum();

        sizes.entry(path.to_string()).or_insert(0);
        for ancestor in ancestors(path) {
            *sizes.entry(ancestor).or_insert(0) += direct;
        }
    }
    sizes
}

/// `/a/b` yields `/`, `/a` and `/a/b`.
fn ancestors(path: &str) -> Vec<String> {
    let mut result = vec!["/".to_string()];
    let mut current = String::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        current.push('/');
        current.push_str(segment);
        result.push(current.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "$ cd /\n$ ls\ndir a\n100 b.txt\n$ cd a\n$ ls\n20 c\n$ cd ..\n";

    #[test]
    fn listing_lands_in_context() {
        let result = grammar().run(TRANSCRIPT);
        assert!(!result.is_failed(), "{:?}", result.error());
        assert!(result.stack().is_empty());
        let root = result.context_value("dir:/").and_then(Value::as_list).unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root[0].to_string(), "Dir { name: \"a\" }");
        assert_eq!(root[1].to_string(), "File { size: 100, name: \"b.txt\" }");
        assert_eq!(result.context_value(CWD), Some(&Value::List(vec![])));
    }

    #[test]
    fn sizes_roll_up_to_ancestors() {
        let result = grammar().run(TRANSCRIPT);
        let sizes = directory_sizes(result.context());
        assert_eq!(sizes.get("/"), Some(&120));
        assert_eq!(sizes.get("/a"), Some(&20));
    }

    #[test]
    fn cannot_leave_root() {
        let result = grammar().run("$ cd /\n$ cd ..\n");
        let message = result.error().unwrap().to_string();
        assert!(message.starts_with("Expected only one parser to match but received none:"));
        assert!(message.contains("Cannot move above the root directory (change_directory("));
    }

    #[test]
    fn ancestors_of_nested_path() {
        assert_eq!(ancestors("/a/b"), vec!["/", "/a", "/a/b"]);
        assert_eq!(ancestors("/"), vec!["/"]);
    }
}
