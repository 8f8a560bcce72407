use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_eduprod");
    let mut child = Command::new(exe)
        .env_remove("EDUPRO_AI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("EDUPRO_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn eduprod");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("eduprod-router-smoke");
    let export_dir = workspace.join("exports");
    std::fs::create_dir_all(&export_dir).expect("export dir");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let calls: Vec<(&str, serde_json::Value)> = vec![
        ("health", json!({})),
        ("workspace.select", json!({ "path": workspace.to_string_lossy() })),
        ("auth.login", json!({ "method": "userId", "userId": "1" })),
        ("session.get", json!({})),
        ("theme.get", json!({})),
        ("theme.set", json!({ "darkMode": true })),
        ("theme.toggle", json!({})),
        ("users.list", json!({})),
        ("users.setVerified", json!({ "userId": "2", "verified": true })),
        ("users.toggleVerified", json!({ "userId": "2" })),
        (
            "users.onboardInstructor",
            json!({ "name": "Rita Ortiz", "email": "rita@edupro.ai", "bio": "Data" }),
        ),
        ("instructors.summary", json!({ "instructorId": "2" })),
        ("courses.list", json!({})),
        ("courses.get", json!({ "courseId": "c1" })),
        ("courses.enroll", json!({ "courseId": "c1" })),
        ("courses.progress", json!({ "courseId": "c1" })),
        ("lessons.complete", json!({ "lessonId": "l1" })),
        ("draft.open", json!({})),
        ("draft.get", json!({})),
        ("draft.setField", json!({ "field": "title", "value": "Smoke" })),
        ("draft.next", json!({})),
        ("draft.addModule", json!({})),
        ("draft.addLesson", json!({ "moduleIndex": 0 })),
        ("draft.select", json!({ "moduleIndex": 0, "lessonIndex": 0 })),
        ("draft.updateModule", json!({ "moduleIndex": 0, "title": "M" })),
        (
            "draft.updateLesson",
            json!({ "moduleIndex": 0, "lessonIndex": 0, "field": "content", "value": "<p>x</p>" }),
        ),
        ("draft.addModule", json!({})),
        ("draft.reorder", json!({ "kind": "module", "sourceIndex": 1, "destIndex": 0 })),
        ("draft.removeModule", json!({ "moduleIndex": 0 })),
        ("draft.addLesson", json!({ "moduleIndex": 0 })),
        ("draft.removeLesson", json!({ "moduleIndex": 0, "lessonIndex": 1 })),
        ("draft.next", json!({})),
        ("draft.back", json!({})),
        ("draft.cancel", json!({})),
        ("certificates.complete", json!({ "courseId": "c3" })),
        ("certificates.find", json!({ "courseId": "c3" })),
        ("certificates.verify", json!({ "rollNumber": "EP-0000-XXXXXX" })),
        ("certificates.list", json!({})),
        ("reviews.submit", json!({ "courseId": "c3", "rating": 4, "comment": "Solid" })),
        ("courses.export", json!({ "outDir": export_dir.to_string_lossy() })),
        ("courses.import", json!({ "text": "[]" })),
        ("assistant.ask", json!({ "message": "hello" })),
        ("assistant.outline", json!({ "topic": "Rust" })),
        (
            "assistant.acceptOutline",
            json!({ "outline": { "title": "T", "description": "D", "modules": [] } }),
        ),
        ("courses.delete", json!({ "courseId": "c2", "confirm": true })),
        ("auth.logout", json!({})),
    ];

    for (i, (method, params)) in calls.into_iter().enumerate() {
        let _ = request(&mut stdin, &mut reader, &format!("s{i}"), method, params);
    }

    let unknown = request(&mut stdin, &mut reader, "u", "no.such.method", json!({}));
    assert_eq!(unknown["ok"], json!(false));
    assert_eq!(unknown["error"]["code"], json!("not_implemented"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn malformed_line_gets_bad_json_without_id() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    writeln!(stdin, "{{not json").expect("write");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read");
    let v: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
    assert_eq!(v["ok"], json!(false));
    assert_eq!(v["error"]["code"], json!("bad_json"));
    assert!(v.get("id").is_none());

    let health = request(&mut stdin, &mut reader, "h", "health", json!({}));
    assert_eq!(health["ok"], json!(true));
    assert_eq!(health["result"]["signedIn"], json!(false));

    drop(stdin);
    let _ = child.wait();
}
