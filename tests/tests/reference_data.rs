use domain::models::ExamplePair;
use infrastructure::reference_data::load_example_pairs;
use tests::examples_csv_file;

#[test]
fn test_pair_count_matches_row_count() {
    let dir = tempfile::tempdir().unwrap();
    for rows in [1usize, 7, 40] {
        let pairs: Vec<ExamplePair> = (0..rows)
            .map(|i| ExamplePair {
                question: format!("How much did I spend in month {i}, \"roughly\"?"),
                sql: format!("SELECT SUM(amount) FROM transactions WHERE strftime('%m', date) = '{i:02}'"),
            })
            .collect();
        let path = examples_csv_file(dir.path(), &pairs);
        let loaded = load_example_pairs(&path).unwrap();
        assert_eq!(loaded.len(), rows);
        assert_eq!(loaded, pairs);
    }
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_example_pairs(dir.path().join("absent.csv")).is_err());
}
