//! Type definitions of a low-level SQL string representation.

/// A SQL statement and the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
    /// One entry per `$n` placeholder, in placeholder order.
    pub params: Vec<Param>,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A variable name to look up in the plan's arguments.
    Variable(String),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
        }
    }

    /// Append raw syntax. Never call this with text that came from a request.
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a quoted identifier. Embedded double quotes are doubled.
    pub fn append_identifier(&mut self, sql: &str) {
        self.sql.push('"');
        self.sql.push_str(&sql.replace('"', "\"\""));
        self.sql.push('"');
    }

    /// Append a positional placeholder and record the parameter it stands for.
    pub fn append_param(&mut self, param: Param) {
        self.params.push(param);
        self.sql.push_str(format!("${}", self.params.len()).as_str());
    }
}
