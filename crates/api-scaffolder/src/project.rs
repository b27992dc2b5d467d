//! Project configuration collected from the user

use crate::error::ScaffoldError;
use clap::ValueEnum;
use std::fmt;

/// A validated project name: non-empty, only `[a-z0-9_-]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(input: &str) -> Result<Self, ScaffoldError> {
        let valid = !input.is_empty()
            && input
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

        if valid {
            Ok(Self(input.to_string()))
        } else {
            Err(ScaffoldError::InvalidProjectName(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Database choice as asked in the prompt, before the ORM is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseKind {
    #[value(name = "mongodb")]
    MongoDb,
    #[value(name = "postgresql")]
    PostgreSql,
}

impl DatabaseKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseKind::MongoDb => "MongoDB",
            DatabaseKind::PostgreSql => "PostgreSQL",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// ORM used with PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Orm {
    Prisma,
    Drizzle,
}

impl Orm {
    pub fn display_name(&self) -> &'static str {
        match self {
            Orm::Prisma => "Prisma",
            Orm::Drizzle => "Drizzle",
        }
    }
}

impl fmt::Display for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Database backend; the ORM only exists for PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    MongoDb,
    PostgreSql { orm: Orm },
}

impl Database {
    pub fn kind(&self) -> DatabaseKind {
        match self {
            Database::MongoDb => DatabaseKind::MongoDb,
            Database::PostgreSql { .. } => DatabaseKind::PostgreSql,
        }
    }

    pub fn orm(&self) -> Option<Orm> {
        match self {
            Database::MongoDb => None,
            Database::PostgreSql { orm } => Some(*orm),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Database::MongoDb => write!(f, "MongoDB (Mongoose)"),
            Database::PostgreSql { orm } => write!(f, "PostgreSQL ({})", orm),
        }
    }
}

/// Everything the generator needs to know about the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_name: ProjectName,
    pub database: Database,
    pub include_docker: bool,
}

impl ProjectConfig {
    pub fn new(project_name: ProjectName, database: Database, include_docker: bool) -> Self {
        Self {
            project_name,
            database,
            include_docker,
        }
    }

    /// Build a config from flat answers, rejecting an ORM outside PostgreSQL
    pub fn from_parts(
        project_name: &str,
        kind: DatabaseKind,
        orm: Option<Orm>,
        include_docker: bool,
    ) -> Result<Self, ScaffoldError> {
        let project_name = ProjectName::parse(project_name)?;
        let database = match (kind, orm) {
            (DatabaseKind::MongoDb, None) => Database::MongoDb,
            (DatabaseKind::MongoDb, Some(_)) => return Err(ScaffoldError::OrmNotSupported),
            (DatabaseKind::PostgreSql, Some(orm)) => Database::PostgreSql { orm },
            (DatabaseKind::PostgreSql, None) => return Err(ScaffoldError::OrmRequired),
        };
        Ok(Self::new(project_name, database, include_docker))
    }
}
