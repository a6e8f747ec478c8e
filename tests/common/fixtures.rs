//! Raw record builders

use serde_json::{json, Value};

pub fn commit(sha: &str, message: &str, author: &str, date: &str, files: usize) -> Value {
    let files: Vec<Value> = (0..files)
        .map(|i| json!({"filename": format!("src/file{}.rs", i), "additions": 2, "deletions": 1}))
        .collect();
    json!({
        "sha": sha,
        "commit": {
            "message": message,
            "author": {"name": author, "email": format!("{}@example.com", author)},
            "committer": {"name": author, "date": date}
        },
        "files": files
    })
}

pub fn pull_request(number: u64, login: &str, created_at: &str, body: Option<&str>, review_comments: u64, changed: u64) -> Value {
    json!({
        "number": number,
        "title": format!("PR #{}", number),
        "state": "closed",
        "merged": true,
        "created_at": created_at,
        "user": {"login": login},
        "body": body,
        "review_comments": review_comments,
        "additions": changed,
        "deletions": 0
    })
}

pub fn event(id: u64, event_type: &str, login: &str, created_at: &str, commits: usize) -> Value {
    let commits: Vec<Value> = (0..commits).map(|i| json!({"sha": format!("p{}", i)})).collect();
    json!({
        "id": id.to_string(),
        "type": event_type,
        "created_at": created_at,
        "actor": {"login": login},
        "payload": {"ref": "refs/heads/main", "commits": commits}
    })
}

pub fn branch(name: &str, protected: bool) -> Value {
    json!({"name": name, "commit": {"sha": format!("{}-head", name)}, "protected": protected})
}

pub fn tag(name: &str) -> Value {
    json!({"name": name, "commit": {"sha": format!("{}-sha", name)}})
}
