use scanf::sscanf;

use crate::error::DbError;
use crate::row::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareError {
    UnrecognizedStatement,
    SyntaxError,
    ParseStringTooLong,
    ParseNegativeAge,
    ParseNulByte,
}

/// Dot commands of the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Page { size: usize, offset: usize },
    Paginate { size: Option<usize> },
    Batch { size: Option<usize> },
    Average,
    Concurrent,
    Seed { path: String },
    Unrecognized(String),
    SyntaxError,
}

const META_COMMANDS: [&str; 7] = [
    ".exit",
    ".page",
    ".paginate",
    ".batch",
    ".avg",
    ".concurrent",
    ".seed",
];

pub fn prepare_statement(src: &str) -> Result<Statement, PrepareError> {
    let src = src.trim();
    let (keyword, rest) = src.split_once(char::is_whitespace).unwrap_or((src, ""));

    match keyword.to_ascii_lowercase().as_str() {
        "insert" => prepare_insert(rest.trim()),
        "select" => Ok(Statement::Select),
        _ => Err(PrepareError::UnrecognizedStatement),
    }
}

fn prepare_insert(args: &str) -> Result<Statement, PrepareError> {
    let mut user_id: String = String::new();
    let mut name: String = String::new();
    let mut email: String = String::new();
    let mut age: i64 = 0;
    if sscanf!(args, "{} {} {} {}", user_id, name, email, age).is_err() {
        return Err(PrepareError::SyntaxError);
    }
    if user_id.is_empty() || name.is_empty() || email.is_empty() {
        return Err(PrepareError::SyntaxError);
    }

    if age < 0 {
        return Err(PrepareError::ParseNegativeAge);
    }
    let age = u32::try_from(age).map_err(|_| PrepareError::SyntaxError)?;

    match Row::new(&user_id, &name, &email, age) {
        Ok(row) => Ok(Statement::Insert(row)),
        Err(DbError::StringTooLong { .. }) => Err(PrepareError::ParseStringTooLong),
        Err(DbError::NulByte { .. }) => Err(PrepareError::ParseNulByte),
        Err(_) => Err(PrepareError::SyntaxError),
    }
}

pub fn parse_meta_command(src: &str) -> MetaCommand {
    let src = src.trim();
    let mut parts = src.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    if !META_COMMANDS.contains(&command.as_str()) {
        return MetaCommand::Unrecognized(src.to_string());
    }
    if command == ".seed" {
        // the rest of the line is the file name, spaces included
        let path = src.split_once(char::is_whitespace).map(|(_, p)| p.trim());
        return match path {
            Some(path) if !path.is_empty() => MetaCommand::Seed {
                path: path.to_string(),
            },
            _ => MetaCommand::SyntaxError,
        };
    }
    let args: Vec<&str> = parts.collect();
    let numbers: Option<Vec<usize>> = args.iter().map(|a| a.parse().ok()).collect();
    let Some(numbers) = numbers else {
        return MetaCommand::SyntaxError;
    };

    match (command.as_str(), numbers.as_slice()) {
        (".exit", []) => MetaCommand::Exit,
        (".page", [size, offset]) => MetaCommand::Page {
            size: *size,
            offset: *offset,
        },
        (".paginate", []) => MetaCommand::Paginate { size: None },
        (".paginate", [size]) => MetaCommand::Paginate { size: Some(*size) },
        (".batch", []) => MetaCommand::Batch { size: None },
        (".batch", [size]) => MetaCommand::Batch { size: Some(*size) },
        (".avg", []) => MetaCommand::Average,
        (".concurrent", []) => MetaCommand::Concurrent,
        _ => MetaCommand::SyntaxError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_value_case() {
        let Ok(Statement::Insert(row)) = prepare_statement("INSERT a1 Alice Alice@Example.com 30")
        else {
            panic!("expected insert");
        };
        assert_eq!(row.user_id(), "a1");
        assert_eq!(row.name(), "Alice");
        assert_eq!(row.email(), "Alice@Example.com");
        assert_eq!(row.age(), 30);
    }

    #[test]
    fn insert_errors() {
        assert_eq!(
            prepare_statement("insert a1 Alice"),
            Err(PrepareError::SyntaxError)
        );
        assert_eq!(
            prepare_statement("insert a1 Alice a@b.c -4"),
            Err(PrepareError::ParseNegativeAge)
        );
        let long = "x".repeat(256);
        assert_eq!(
            prepare_statement(&format!("insert a1 {long} a@b.c 4")),
            Err(PrepareError::ParseStringTooLong)
        );
        assert_eq!(
            prepare_statement("update users"),
            Err(PrepareError::UnrecognizedStatement)
        );
        assert_eq!(
            prepare_statement("insert a\0b Alice a@b.c 4"),
            Err(PrepareError::ParseNulByte)
        );
        assert_eq!(prepare_statement("SeLeCt"), Ok(Statement::Select));
    }

    #[test]
    fn meta_commands() {
        assert_eq!(parse_meta_command(".exit"), MetaCommand::Exit);
        assert_eq!(
            parse_meta_command(".page 10 20"),
            MetaCommand::Page {
                size: 10,
                offset: 20
            }
        );
        assert_eq!(
            parse_meta_command(".paginate 3"),
            MetaCommand::Paginate { size: Some(3) }
        );
        assert_eq!(parse_meta_command(".page 10"), MetaCommand::SyntaxError);
        assert_eq!(
            parse_meta_command(".SEED data/user data.csv "),
            MetaCommand::Seed {
                path: "data/user data.csv".into()
            }
        );
        assert_eq!(parse_meta_command(".seed"), MetaCommand::SyntaxError);
        assert_eq!(parse_meta_command(".batch x"), MetaCommand::SyntaxError);
        assert_eq!(
            parse_meta_command(".tables"),
            MetaCommand::Unrecognized(".tables".into())
        );
        assert_eq!(
            parse_meta_command(".tables users"),
            MetaCommand::Unrecognized(".tables users".into())
        );
    }
}
