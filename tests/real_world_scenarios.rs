// this_file: tests/real_world_scenarios.rs

use jsonpull::{parse, JsonStream, ObjectBuilder, StreamConfig, StreamMode, Value};

const STORE: &str = r#"{
    "store": {
        "book": [
            {"category": "reference", "author": "Nigel Rees",      "title": "Sayings of the Century", "price": 8.95},
            {"category": "fiction",   "author": "Evelyn Waugh",    "title": "Sword of Honour",        "price": 12.99},
            {"category": "fiction",   "author": "Herman Melville", "title": "Moby Dick",              "price": 8.99},
            {"category": "fiction",   "author": "J. R. R. Tolkien","title": "The Lord of the Rings",  "price": 22.99}
        ],
        "bicycle": {"color": "red", "price": 19.95}
    },
    "expensive": 10
}"#;

fn collect(input: &str, path: &str) -> Vec<Value> {
    let mut stream =
        JsonStream::from_slice(input.as_bytes(), StreamConfig::with_path(path)).unwrap();
    let mut out = Vec::new();
    while let Some(value) = stream.next_value().unwrap() {
        out.push(value);
    }
    out
}

#[test]
fn test_store_all_books_stream() {
    let mut stream =
        JsonStream::from_slice(STORE.as_bytes(), StreamConfig::with_path("$.store.book[*]"))
            .unwrap();
    assert_eq!(stream.mode(), StreamMode::SimpleStreaming);
    let mut authors = Vec::new();
    while let Some(book) = stream.next_value().unwrap() {
        authors.push(book["author"].as_str().unwrap().to_string());
    }
    assert_eq!(
        authors,
        [
            "Nigel Rees",
            "Evelyn Waugh",
            "Herman Melville",
            "J. R. R. Tolkien"
        ]
    );
}

#[test]
fn test_store_second_book() {
    let books = collect(STORE, "$.store.book[1]");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"].as_str(), Some("Sword of Honour"));
}

#[test]
fn test_store_all_authors_recursively() {
    let authors = collect(STORE, "$..author");
    assert_eq!(authors.len(), 4);
    assert_eq!(authors[0].as_str(), Some("Nigel Rees"));
}

#[test]
fn test_store_all_prices_recursively() {
    let prices = collect(STORE, "$..price");
    // The bicycle plus the four books; the shallower bicycle price comes
    // from a later sibling, so the walk surfaces book prices first.
    assert_eq!(prices.len(), 5);
}

#[test]
fn test_store_cheap_books() {
    let cheap = collect(STORE, "$.store.book[?(@.price < 10)]");
    assert_eq!(cheap.len(), 2);
    assert_eq!(cheap[0]["title"].as_str(), Some("Sayings of the Century"));
    assert_eq!(cheap[1]["title"].as_str(), Some("Moby Dick"));
}

#[test]
fn test_store_fiction_by_category() {
    let fiction = collect(STORE, "$.store.book[?(@.category == 'fiction')]");
    assert_eq!(fiction.len(), 3);
}

#[test]
fn test_store_book_titles_after_wildcard() {
    let titles = collect(STORE, "$.store.book[*].title");
    let got: Vec<&str> = titles.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(
        got,
        [
            "Sayings of the Century",
            "Sword of Honour",
            "Moby Dick",
            "The Lord of the Rings"
        ]
    );
}

#[test]
fn test_store_last_book_negative_index() {
    let last = collect(STORE, "$.store.book[-1]");
    assert_eq!(last.len(), 1);
    assert_eq!(last[0]["title"].as_str(), Some("The Lord of the Rings"));
}

#[test]
fn test_store_first_two_books_slice() {
    let first_two = collect(STORE, "$.store.book[:2]");
    assert_eq!(first_two.len(), 2);
    assert_eq!(first_two[1]["author"].as_str(), Some("Evelyn Waugh"));
}

#[test]
fn test_event_log_batch() {
    // A paginated event feed: pull one page of events out of the
    // envelope without touching the metadata.
    let mut doc = String::from(r#"{"meta":{"page":7,"total":912},"events":["#);
    for i in 0..50 {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id":{i},"kind":"click","ts":1722500000.{i}}}"#
        ));
    }
    doc.push_str("]}");

    let events = collect(&doc, "$.events[*]");
    assert_eq!(events.len(), 50);
    assert_eq!(events[49]["id"].as_i64(), Some(49));
}

#[test]
fn test_config_document_lookup() {
    let config = r#"{
        "service": {
            "name": "ingest",
            "listen": {"host": "0.0.0.0", "port": 8443},
            "limits": {"max_body": 1048576, "timeout_s": 30}
        },
        "log_level": "info"
    }"#;
    let port = collect(config, "$.service.listen.port");
    assert_eq!(port.len(), 1);
    assert_eq!(port[0].as_i64(), Some(8443));

    let expected = ObjectBuilder::new()
        .integer("max_body", 1_048_576)
        .integer("timeout_s", 30)
        .build();
    let limits = collect(config, "$.service.limits");
    assert_eq!(limits, vec![expected]);
}

#[test]
fn test_whole_document_round_trip() {
    let value = parse(STORE).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
    let original: serde_json::Value = serde_json::from_str(STORE).unwrap();
    assert_eq!(original, reparsed);
}
