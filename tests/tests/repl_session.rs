use application::assistant::{AssistantSettings, FinanceAssistant};
use domain::session::Message;
use infrastructure::finance_db::FinanceDb;
use presentation::repl::{run_repl, BufReadSource, EMPTY_INPUT_REMINDER};
use std::io::Cursor;
use std::sync::Arc;
use tests::{finance_db_file, food_example, HashEmbeddings, ScriptedChat};

#[tokio::test]
async fn test_repl_forwards_questions_to_the_agent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = finance_db_file(dir.path(), &[(Some("food"), Some("Deli"), 4.0)]);
    let chat = ScriptedChat::new(vec![Message::assistant("You made two purchases.")]);
    let assistant = FinanceAssistant::assemble(
        chat.clone(),
        HashEmbeddings::new(),
        Arc::new(FinanceDb::open_read_only(&db_path).unwrap()),
        &[food_example()],
        AssistantSettings {
            retriever_top_k: 4,
            sql_top_k: 10,
            max_iterations: 5,
        },
    )
    .await
    .unwrap();

    let mut source = BufReadSource::new(Cursor::new("How many purchases?\n   \nAnd yesterday?\n"));
    let mut out = Vec::new();
    let summary = run_repl(&assistant, &mut source, &mut out).await.unwrap();

    assert_eq!(summary.answered, 1);
    assert_eq!(summary.skipped_empty, 1);
    // The script is exhausted by the second question.
    assert_eq!(summary.failed, 1);

    let transcripts = chat.transcripts();
    assert_eq!(transcripts.len(), 2);
    assert_eq!(transcripts[0][1], Message::user("How many purchases?"));
    assert_eq!(transcripts[1][1], Message::user("And yesterday?"));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("You made two purchases."));
    assert!(printed.contains(EMPTY_INPUT_REMINDER));
}
