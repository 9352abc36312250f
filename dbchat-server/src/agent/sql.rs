//! Two-stage LLM SQL agent
//!
//! 1. Plan: schema + question → one PostgreSQL SELECT.
//! 2. Execute it read-only.
//! 3. Answer: question + rows → short plain-language reply.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{AgentError, LlmProvider, QueryExecutor, SqlAgent};
use crate::schema::{describe_tables, TABLES};

/// Rows handed to the answering prompt at most.
pub const DEFAULT_MAX_ROWS: usize = 50;

const PLAN_SYSTEM: &str = "You write SQL for Postgres to answer the user's question. \
Use only the tables and columns listed. \
Return ONLY one valid SELECT query with no commentary and no markdown.";

const ANSWER_SYSTEM: &str = "You answer questions about a shop's users, products and orders \
using the query results you are given. Respond with a short, friendly, non-technical answer. \
Do not mention SQL, table names, schemas, or any internal tools. \
If the results are empty, say that nothing matched.";

pub struct LlmSqlAgent {
    llm: Arc<dyn LlmProvider>,
    executor: Arc<dyn QueryExecutor>,
    schema: String,
    max_rows: usize,
}

impl LlmSqlAgent {
    pub fn new(llm: Arc<dyn LlmProvider>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            llm,
            executor,
            schema: describe_tables(TABLES),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    fn plan_prompt(&self, question: &str) -> String {
        format!(
            "Tables:\n{}\nQuestion: {}\n\nSQL:",
            self.schema, question
        )
    }

    fn answer_prompt(&self, question: &str, rows: &Value) -> Result<String, AgentError> {
        let all = rows.as_array().map(Vec::as_slice).unwrap_or_default();
        let shown = &all[..all.len().min(self.max_rows)];
        let note = if shown.len() < all.len() {
            format!(" (first {} of {})", shown.len(), all.len())
        } else {
            String::new()
        };
        Ok(format!(
            "Question: {}\n\nResults, {} rows{}:\n{}",
            question,
            all.len(),
            note,
            serde_json::to_string(shown)?
        ))
    }
}

#[async_trait]
impl SqlAgent for LlmSqlAgent {
    async fn answer(&self, question: &str) -> Result<String, AgentError> {
        let raw = self
            .llm
            .complete(PLAN_SYSTEM, &self.plan_prompt(question))
            .await?;
        let sql = clean_sql(&raw)?;
        tracing::info!(llm = self.llm.name(), sql = %sql, "Generated query");

        let rows = self.executor.run_read_only(&sql).await?;
        tracing::debug!(rows = rows.as_array().map_or(0, Vec::len), "Query executed");

        self.llm
            .complete(ANSWER_SYSTEM, &self.answer_prompt(question, &rows)?)
            .await
    }
}

/// Strip markdown fences and a trailing `;`, then require exactly one
/// SELECT/WITH statement.
pub fn clean_sql(raw: &str) -> Result<String, AgentError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("```sql")
        .or_else(|| trimmed.strip_prefix("```SQL"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let inner = inner.strip_suffix("```").unwrap_or(inner).trim();
    let sql = strip_leading_comments(inner)
        .trim_end_matches(';')
        .trim_end();

    let keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if keyword != "select" && keyword != "with" {
        return Err(AgentError::InvalidSql(truncate(sql)));
    }
    if sql.contains(';') {
        return Err(AgentError::InvalidSql(truncate(sql)));
    }
    Ok(sql.to_string())
}

/// Drop `-- line` and `/* block */` comments ahead of the first keyword.
/// An unterminated block comment leaves nothing.
fn strip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(line) = rest.strip_prefix("--") {
            rest = line.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(block) = rest.strip_prefix("/*") {
            rest = block.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else {
            return rest;
        }
    }
}

fn truncate(sql: &str) -> String {
    sql.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;

    /// Replies from a script, recording every prompt it sees.
    #[derive(Default)]
    struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<String, AgentError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<Result<String, AgentError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, AgentError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AgentError::EmptyResponse))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct StubExecutor {
        rows: Value,
        seen: Mutex<Vec<String>>,
    }

    impl StubExecutor {
        fn returning(rows: Value) -> Self {
            Self {
                rows,
                seen: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl QueryExecutor for StubExecutor {
        async fn run_read_only(&self, sql: &str) -> Result<Value, AgentError> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl QueryExecutor for FailingExecutor {
        async fn run_read_only(&self, _sql: &str) -> Result<Value, AgentError> {
            Err(AgentError::Query(sqlx::Error::RowNotFound))
        }
    }

    #[test]
    fn clean_sql_strips_fences_and_semicolon() {
        let sql = clean_sql("```sql\nSELECT COUNT(*) FROM users;\n```").unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM users");
    }

    #[test]
    fn clean_sql_accepts_cte() {
        let sql = clean_sql("  with t as (select 1) select * from t ").unwrap();
        assert_eq!(sql, "with t as (select 1) select * from t");
    }

    #[test]
    fn clean_sql_rejects_writes_and_prose() {
        assert!(matches!(
            clean_sql("DELETE FROM users"),
            Err(AgentError::InvalidSql(_))
        ));
        assert!(matches!(
            clean_sql("Sure! Here is the query you asked for."),
            Err(AgentError::InvalidSql(_))
        ));
        assert!(matches!(clean_sql(""), Err(AgentError::InvalidSql(_))));
    }

    #[test]
    fn clean_sql_skips_leading_comments() {
        let sql = clean_sql("```sql\n-- Count all users\nSELECT COUNT(*) FROM users;\n```").unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM users");

        let sql = clean_sql("/* top products */\n-- by price\nSELECT name FROM products").unwrap();
        assert_eq!(sql, "SELECT name FROM products");
    }

    #[test]
    fn clean_sql_keeps_trailing_comment() {
        let sql = clean_sql("SELECT name FROM products ORDER BY price DESC LIMIT 3 -- top three").unwrap();
        assert_eq!(sql, "SELECT name FROM products ORDER BY price DESC LIMIT 3 -- top three");
    }

    #[test]
    fn clean_sql_comment_cannot_hide_a_write() {
        assert!(matches!(
            clean_sql("-- harmless\nDELETE FROM users"),
            Err(AgentError::InvalidSql(_))
        ));
        assert!(matches!(
            clean_sql("/* never closed SELECT 1"),
            Err(AgentError::InvalidSql(_))
        ));
    }

    #[test]
    fn clean_sql_rejects_stacked_statements() {
        assert!(matches!(
            clean_sql("SELECT 1; DROP TABLE users"),
            Err(AgentError::InvalidSql(_))
        ));
    }

    #[tokio::test]
    async fn plans_executes_and_answers() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("```sql\nSELECT COUNT(*) AS n FROM users;\n```".into()),
            Ok("There are 5 users.".into()),
        ]));
        let executor = Arc::new(StubExecutor::returning(json!([{ "n": 5 }])));
        let agent = LlmSqlAgent::new(llm.clone(), executor.clone());

        let answer = agent.answer("How many users are in the system?").await.unwrap();

        assert_eq!(answer, "There are 5 users.");
        assert_eq!(
            *executor.seen.lock().unwrap(),
            vec!["SELECT COUNT(*) AS n FROM users".to_string()]
        );
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("orders.user_id -> users.user_id"));
        assert!(prompts[0].contains("How many users are in the system?"));
        assert!(prompts[1].contains(r#"[{"n":5}]"#));
    }

    #[tokio::test]
    async fn invalid_sql_never_reaches_the_database() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("UPDATE products SET stock = 0".into())]));
        let executor = Arc::new(StubExecutor::returning(json!([])));
        let agent = LlmSqlAgent::new(llm, executor.clone());

        let err = agent.answer("empty the warehouse").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidSql(_)));
        assert!(executor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn execution_errors_propagate() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("SELECT nope FROM users".into())]));
        let agent = LlmSqlAgent::new(llm.clone(), Arc::new(FailingExecutor));

        let err = agent.answer("broken").await.unwrap_err();
        assert!(matches!(err, AgentError::Query(_)));
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn answer_prompt_caps_rows() {
        let agent = LlmSqlAgent::new(Arc::new(ScriptedLlm::default()), Arc::new(FailingExecutor))
            .with_max_rows(2);
        let rows = json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]);

        let prompt = agent.answer_prompt("list ids", &rows).unwrap();
        assert!(prompt.contains("3 rows (first 2 of 3)"));
        assert!(prompt.contains(r#"[{"id":1},{"id":2}]"#));
    }
}
