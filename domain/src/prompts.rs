//! Prompt text handed to the chat model.
//!
//! The tool names, tool descriptions and the agent suffix steer which tools
//! the model reaches for and in what order. Changing them changes behaviour.

pub const SQL_EXAMPLES_TOOL_NAME: &str = "sql_get_similar_examples";

pub const SQL_EXAMPLES_TOOL_DESCRIPTION: &str = "This tool will help you understand similar examples to adapt them to the user question.
Input to this tool should be the user question.";

pub const NAME_SEARCH_TOOL_NAME: &str = "name_search";

pub const NAME_SEARCH_TOOL_DESCRIPTION: &str =
    "use to learn how a piece of data is actually written, can be from transaction category, merchant name etc";

pub const AGENT_SUFFIX: &str = "If a user asks for me to filter based on proper nouns, I should first check the spelling using the name_search tool.
I should first get the similar examples I know.
If the examples are enough to construct the query, I can build it.
Otherwise, I can then look at the tables in the database to see what I can query.
Then I should query the schema of the most relevant tables";

pub const LIST_TABLES_TOOL_NAME: &str = "sql_db_list_tables";

pub const LIST_TABLES_TOOL_DESCRIPTION: &str =
    "Input is an empty string, output is a comma-separated list of tables in the database.";

pub const SCHEMA_TOOL_NAME: &str = "sql_db_schema";

pub const SCHEMA_TOOL_DESCRIPTION: &str = "Input to this tool is a comma-separated list of tables, output is the schema and sample rows for those tables. Be sure that the tables actually exist by calling sql_db_list_tables first! Example Input: table1, table2, table3";

pub const QUERY_TOOL_NAME: &str = "sql_db_query";

pub const QUERY_TOOL_DESCRIPTION: &str = "Input to this tool is a detailed and correct SQL query, output is a result from the database. If the query is not correct, an error message will be returned. If an error is returned, rewrite the query, check the query, and try again. If you encounter an issue with Unknown column 'xxxx' in 'field list', use sql_db_schema to query the correct table fields.";

pub const QUERY_CHECKER_TOOL_NAME: &str = "sql_db_query_checker";

pub const QUERY_CHECKER_TOOL_DESCRIPTION: &str = "Use this tool to double check if your query is correct before executing it. Always use this tool before executing a query with sql_db_query!";

/// Returned when the agent runs out of steps without a final answer.
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// System instructions for the SQL agent.
pub fn agent_prefix(dialect: &str, top_k: usize) -> String {
    format!(
        "You are an agent designed to interact with a SQL database.
Given an input question, create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most {top_k} results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the relevant columns given the question.
You have access to tools for interacting with the database.
Only use the below tools. Only use the information returned by the below tools to construct your final answer.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.

DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.

If the question does not seem related to the database, just return \"I don't know\" as the answer."
    )
}

/// Prompt asking the model to review a query before it runs.
pub fn query_checker_prompt(dialect: &str, query: &str) -> String {
    format!(
        "{query}
Double check the {dialect} query above for common mistakes, including:
- Using NOT IN with NULL values
- Using UNION when UNION ALL should have been used
- Using BETWEEN for exclusive ranges
- Data type mismatch in predicates
- Properly quoting identifiers
- Using the correct number of arguments for functions
- Casting to the correct data type
- Using the proper columns for joins

If there are any of the above mistakes, rewrite the query. If there are no mistakes, just reproduce the original query.

Output the final SQL query only.

SQL Query: "
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_mentions_dialect_and_limit() {
        let prefix = agent_prefix("SQLite", 10);
        assert!(prefix.contains("syntactically correct SQLite query"));
        assert!(prefix.contains("at most 10 results"));
    }

    #[test]
    fn test_suffix_points_at_both_retrieval_tools() {
        assert!(AGENT_SUFFIX.contains(NAME_SEARCH_TOOL_NAME));
        assert!(AGENT_SUFFIX.contains("similar examples"));
    }
}
