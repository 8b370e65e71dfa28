use crate::Result;

/// Conversion into a list of SQL statements.
///
/// Lets schema helpers returning a single statement, several statements or
/// a fallible result be handed to a [`SqlBuffer`](crate::migrate::SqlBuffer)
/// uniformly.
pub trait ToSqlStatementList {
    fn to_statement_list(self) -> Result<Vec<String>>;
}

impl ToSqlStatementList for String {
    fn to_statement_list(self) -> Result<Vec<String>> {
        Ok(vec![self])
    }
}

impl ToSqlStatementList for &str {
    fn to_statement_list(self) -> Result<Vec<String>> {
        Ok(vec![self.to_string()])
    }
}

impl ToSqlStatementList for Vec<String> {
    fn to_statement_list(self) -> Result<Vec<String>> {
        Ok(self)
    }
}

impl ToSqlStatementList for Vec<&str> {
    fn to_statement_list(self) -> Result<Vec<String>> {
        Ok(self.into_iter().map(String::from).collect())
    }
}

impl ToSqlStatementList for Result<String> {
    fn to_statement_list(self) -> Result<Vec<String>> {
        Ok(vec![self?])
    }
}

impl ToSqlStatementList for Result<Vec<String>> {
    fn to_statement_list(self) -> Result<Vec<String>> {
        self
    }
}
