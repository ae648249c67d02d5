use application::assistant::{AssistantSettings, FinanceAssistant};
use application::rag_service::extract_names;
use domain::session::{Message, ToolCall};
use infrastructure::error::InfraError;
use infrastructure::finance_db::FinanceDb;
use infrastructure::reference_data::load_example_pairs;
use serde_json::json;
use std::sync::Arc;
use tests::{examples_csv_file, finance_db_file, food_example, HashEmbeddings, ScriptedChat};

fn settings() -> AssistantSettings {
    AssistantSettings {
        retriever_top_k: 4,
        sql_top_k: 10,
        max_iterations: 15,
    }
}

#[test]
fn test_name_corpus_from_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = finance_db_file(
        dir.path(),
        &[
            (Some("food"), Some("Starbucks3"), 12.5),
            (Some("travel12"), None, 300.0),
        ],
    );
    let db = FinanceDb::open_read_only(&path).unwrap();
    assert_eq!(
        extract_names(&db).unwrap(),
        vec!["food", "travel", "Starbucks"]
    );
}

#[test]
fn test_names_keep_their_stored_spacing() {
    let dir = tempfile::tempdir().unwrap();
    let path = finance_db_file(
        dir.path(),
        &[(Some(" groceries 2 "), Some("Whole  Foods 12"), 54.0)],
    );
    let db = FinanceDb::open_read_only(&path).unwrap();
    assert_eq!(extract_names(&db).unwrap(), vec!["groceries", "Whole  Foods"]);
}

#[tokio::test]
async fn test_question_answered_through_tools() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = finance_db_file(
        dir.path(),
        &[
            (Some("food"), Some("Starbucks3"), 12.5),
            (Some("travel12"), None, 300.0),
        ],
    );
    let csv_path = examples_csv_file(dir.path(), &[food_example()]);
    let pairs = load_example_pairs(&csv_path).unwrap();
    assert_eq!(pairs, vec![food_example()]);

    let chat = ScriptedChat::new(vec![
        Message::assistant_tool_calls(vec![
            ToolCall::new("name_search", json!({"query": "starbucks"})),
            ToolCall::new(
                "sql_get_similar_examples",
                json!({"query": "How much did I spend on food?"}),
            ),
        ]),
        Message::assistant_tool_calls(vec![ToolCall::new(
            "sql_db_query",
            json!({"query": "SELECT SUM(amount) FROM transactions WHERE category='food'"}),
        )]),
        Message::assistant("You spent $12.50 on food."),
    ]);
    let embeddings = HashEmbeddings::new();
    let db = Arc::new(FinanceDb::open_read_only(&db_path).unwrap());
    let assistant = FinanceAssistant::assemble(
        chat.clone(),
        embeddings.clone(),
        db,
        &pairs,
        settings(),
    )
    .await
    .unwrap();

    assert_eq!(assistant.knowledge().examples.len(), 1);
    assert_eq!(assistant.knowledge().names.len(), 3);
    assert_eq!(
        assistant.agent().tools().names(),
        vec![
            "sql_get_similar_examples",
            "name_search",
            "sql_db_query",
            "sql_db_schema",
            "sql_db_list_tables",
            "sql_db_query_checker"
        ]
    );
    let embedded_at_startup = embeddings.calls();
    assert_eq!(embedded_at_startup, 4);

    let answer = assistant.ask("How much did I spend on food?").await.unwrap();
    assert_eq!(answer, "You spent $12.50 on food.");
    assert_eq!(embeddings.calls(), embedded_at_startup + 2);

    let outputs = chat.tool_outputs();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].0, "name_search");
    assert!(outputs[0].1.split("\n\n").any(|name| name == "Starbucks"));
    assert_eq!(outputs[1].0, "sql_get_similar_examples");
    assert_eq!(
        outputs[1].1,
        "Question: How much did I spend on food?\nSQL: SELECT SUM(amount) FROM transactions WHERE category='food'"
    );
    assert_eq!(outputs[2], ("sql_db_query".to_string(), "SUM(amount)\n12.5".to_string()));

    let first = &chat.transcripts()[0];
    assert_eq!(first[1], Message::user("How much did I spend on food?"));
}

#[tokio::test]
async fn test_empty_reference_file_fails_setup() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = finance_db_file(dir.path(), &[(Some("food"), Some("Deli"), 1.0)]);
    let csv_path = examples_csv_file(dir.path(), &[]);
    let pairs = load_example_pairs(&csv_path).unwrap();
    assert!(pairs.is_empty());

    let result = FinanceAssistant::assemble(
        ScriptedChat::default(),
        HashEmbeddings::new(),
        Arc::new(FinanceDb::open_read_only(&db_path).unwrap()),
        &pairs,
        settings(),
    )
    .await;
    let err = result.err().expect("setup must fail on an empty reference file");
    assert!(matches!(
        err.downcast_ref::<InfraError>(),
        Some(InfraError::EmptyIndex(_))
    ));
}

#[tokio::test]
async fn test_agent_cannot_modify_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = finance_db_file(dir.path(), &[(Some("food"), Some("Deli"), 1.0)]);
    let chat = ScriptedChat::new(vec![
        Message::assistant_tool_calls(vec![ToolCall::new(
            "sql_db_query",
            json!({"query": "DELETE FROM transactions"}),
        )]),
        Message::assistant("I could not do that."),
    ]);
    let db = Arc::new(FinanceDb::open_read_only(&db_path).unwrap());
    let assistant = FinanceAssistant::assemble(
        chat.clone(),
        HashEmbeddings::new(),
        db.clone(),
        &[food_example()],
        settings(),
    )
    .await
    .unwrap();

    assistant.ask("delete everything").await.unwrap();
    assert!(chat.tool_outputs()[0].1.starts_with("Error:"));
    assert_eq!(
        db.run_query("SELECT COUNT(*) FROM transactions").unwrap().rows,
        vec![vec!["1".to_string()]]
    );
}
