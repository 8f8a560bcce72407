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

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let resp = request(stdin, reader, id, method, params);
    assert_eq!(
        resp.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        resp
    );
    resp.get("result").cloned().unwrap_or(serde_json::Value::Null)
}

fn error_code(resp: &serde_json::Value) -> &str {
    resp.get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn login(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, user_id: &str) {
    let _ = request_ok(
        stdin,
        reader,
        "login",
        "auth.login",
        json!({ "method": "userId", "userId": user_id }),
    );
}

#[test]
fn export_is_scoped_by_role_and_written_as_dated_backup() {
    let out_dir = temp_dir("eduprod-export");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    login(&mut stdin, &mut reader, "3");
    let student = request(&mut stdin, &mut reader, "1", "courses.export", json!({}));
    assert_eq!(error_code(&student), "forbidden");

    login(&mut stdin, &mut reader, "1");
    let admin = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "courses.export",
        json!({ "outDir": out_dir.to_string_lossy() }),
    );
    assert_eq!(admin["courseCount"], json!(3));
    let path = PathBuf::from(admin["path"].as_str().expect("path"));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("file name")
        .to_string();
    assert!(name.starts_with("edupro_courses_backup_"), "{name}");
    assert!(name.ends_with(".json"), "{name}");

    let text = std::fs::read_to_string(&path).expect("read export");
    let written: serde_json::Value = serde_json::from_str(&text).expect("export json");
    assert_eq!(written.as_array().map(|a| a.len()), Some(3));
    assert_eq!(written[0]["id"], json!("c1"));
    let document: serde_json::Value =
        serde_json::from_str(admin["document"].as_str().expect("document")).expect("document json");
    assert_eq!(document, written);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "users.onboardInstructor",
        json!({ "name": "Rita Ortiz", "email": "rita@edupro.ai" }),
    );
    let users = request_ok(&mut stdin, &mut reader, "4", "users.list", json!({}));
    let rita = users["users"]
        .as_array()
        .and_then(|u| u.iter().find(|u| u["email"] == json!("rita@edupro.ai")))
        .cloned()
        .expect("onboarded instructor");
    login(&mut stdin, &mut reader, rita["id"].as_str().expect("id"));
    let empty = request_ok(&mut stdin, &mut reader, "5", "courses.export", json!({}));
    assert_eq!(empty["courseCount"], json!(0));
    assert!(empty["path"].is_null());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn import_upserts_by_id_and_appends_new_courses() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader, "1");

    let doc = json!([
        { "id": "c2", "title": "Design Fundamentals v2", "instructorId": "2", "price": 10 },
        { "id": "c9", "title": "Imported Course", "category": "Business" }
    ]);
    let out = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "courses.import",
        json!({ "text": doc.to_string() }),
    );
    assert_eq!(out["imported"], json!(2));
    assert_eq!(out["inserted"], json!(1));
    assert_eq!(out["replaced"], json!(1));

    let list = request_ok(&mut stdin, &mut reader, "2", "courses.list", json!({}));
    let ids: Vec<&str> = list["courses"]
        .as_array()
        .expect("courses")
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "c3", "c9"]);
    assert_eq!(list["courses"][1]["title"], json!("Design Fundamentals v2"));
    assert_eq!(list["courses"][3]["rating"], json!(5.0));

    let business = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "courses.list",
        json!({ "category": "Business" }),
    );
    assert_eq!(business["courses"].as_array().map(|c| c.len()), Some(1));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn malformed_imports_leave_catalog_untouched() {
    let dir = temp_dir("eduprod-import-bad");
    let file = dir.join("backup.json");
    std::fs::write(&file, r#"{"id":"c1","title":"not an array"}"#).expect("write file");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader, "2");

    for (i, text) in [
        "not json at all",
        "{\"id\":\"x\",\"title\":\"object\"}",
        "[{\"title\":\"no id\"}]",
        "[{\"id\":\"x\",\"title\":\"\"}]",
    ]
    .iter()
    .enumerate()
    {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("t{i}"),
            "courses.import",
            json!({ "text": text }),
        );
        assert_eq!(error_code(&resp), "invalid_import", "input {text}");
    }

    let from_file = request(
        &mut stdin,
        &mut reader,
        "f",
        "courses.import",
        json!({ "path": file.to_string_lossy() }),
    );
    assert_eq!(error_code(&from_file), "invalid_import");

    let list = request_ok(&mut stdin, &mut reader, "l", "courses.list", json!({}));
    assert_eq!(list["courses"].as_array().map(|c| c.len()), Some(3));

    drop(stdin);
    let _ = child.wait();
}
