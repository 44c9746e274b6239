//! Shared fixtures for the arjson benchmarks

pub const SMALL_JSON: &str = r#"{"id": 1, "name": "test", "status": "active"}"#;

pub const MEDIUM_JSON: &str = r#"{
  "user": {
    "id": 12345,
    "name": "John Doe",
    "email": "john.doe@example.com",
    "status": "active",
    "profile": {
      "bio": "Software engineer\nBased in \"SF\"",
      "location": "San Francisco",
      "company": "TechCorp"
    },
    "posts": [
      {"id": 1, "title": "Hello World", "likes": 25},
      {"id": 2, "title": "Tech Tips", "likes": 42}
    ]
  }
}"#;

/// Catalogue document with `items` records
pub fn generate_large_json(items: usize) -> String {
    let records: Vec<String> = (0..items)
        .map(|i| {
            format!(
                r#"{{
            "id": {},
            "name": "Item {}",
            "description": "This is item number {} with some \"quoted\" content",
            "price": {:.2},
            "category": "Category {}",
            "active": {},
            "metadata": {{
                "created": "2024-01-01T10:30:00Z",
                "tags": ["tag1", "tag2", "tag3"]
            }}
        }}"#,
                i,
                i,
                i,
                i as f64 * 1.5 + 10.0,
                i % 10,
                i % 2 == 0
            )
        })
        .collect();

    format!(
        r#"{{
        "data": [{}],
        "total": {},
        "page": 1,
        "metadata": {{
            "generated_at": "2024-01-15T12:00:00Z",
            "version": "1.0"
        }}
    }}"#,
        records.join(","),
        items
    )
}

/// `depth` nested arrays around a single number
pub fn generate_nested_json(depth: usize) -> String {
    format!("{}1{}", "[".repeat(depth), "]".repeat(depth))
}
