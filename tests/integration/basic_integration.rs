/// Basic integration tests: drive the MCP server the way a client would
use habit_tracker::*;
use serde_json::{json, Value};
use tempfile::tempdir;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    async fn server_in(dir: &std::path::Path) -> McpServer {
        let tracker = HabitTrackerServer::new(TrackerConfig::with_data_dir(dir))
            .await
            .expect("Failed to create server");
        McpServer::new(tracker)
    }

    async fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": tool, "arguments": arguments}
        });
        let response = server
            .process_line(&request.to_string())
            .await
            .expect("tools/call must be answered");
        serde_json::to_value(response).unwrap()
    }

    fn text(response: &Value) -> &str {
        response["result"]["content"][0]["text"].as_str().unwrap()
    }

    fn created_id(response: &Value) -> String {
        text(response)
            .lines()
            .find_map(|line| line.strip_prefix("Habit ID: "))
            .expect("create response carries the id")
            .to_string()
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["result"]["protocolVersion"], json!("2024-11-05"));

        let notification = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(notification.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        let names: Vec<&str> = value["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();

        for expected in ["habit_create", "habit_toggle", "habit_status", "theme_set"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_create_toggle_and_persist() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let created =
            call(&mut server, 1, "habit_create", json!({"name": "Read", "emoji": "📚"})).await;
        let habit_id = created_id(&created);

        let toggled = call(&mut server, 2, "habit_toggle", json!({"habit_id": habit_id})).await;
        assert_eq!(toggled["result"]["isError"], json!(false));
        assert!(text(&toggled).contains("Current streak: 1 day"));

        // a fresh server over the same directory sees the saved state
        let mut reloaded = server_in(dir.path()).await;
        let habits = reloaded.habit_tracker().habits();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].completed_days.len(), 1);

        let status = call(&mut reloaded, 3, "habit_status", json!({"habit_id": habit_id})).await;
        assert!(text(&status).contains("Current streak: 1 day |"));
    }

    #[tokio::test]
    async fn test_count_habit_progress() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let args = json!({"name": "Water", "type": "count", "goal": "2"});
        let created = call(&mut server, 1, "habit_create", args).await;
        let habit_id = created_id(&created);

        call(&mut server, 2, "habit_increment", json!({"habit_id": habit_id})).await;
        let second = call(&mut server, 3, "habit_increment", json!({"habit_id": habit_id})).await;
        assert!(text(&second).contains("2/2 today"));

        for id in 4..8 {
            call(&mut server, id, "habit_decrement", json!({"habit_id": habit_id})).await;
        }
        let habit = &server.habit_tracker().habits()[0];
        assert!(habit.day_counts.values().all(|count| *count == 0));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let created = call(&mut server, 1, "habit_create", json!({"name": "Run"})).await;
        let habit_id = created_id(&created);

        let args = json!({"habit_id": habit_id, "name": "Jog", "type": "count"});
        let updated = call(&mut server, 2, "habit_update", args).await;
        assert!(text(&updated).contains("Switched 'Jog'"));

        let deleted = call(&mut server, 3, "habit_delete", json!({"habit_id": habit_id})).await;
        assert_eq!(deleted["result"]["isError"], json!(false));
        assert!(server.habit_tracker().habits().is_empty());

        let raw = std::fs::read_to_string(dir.path().join("habits.json")).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["habits"], json!([]));
    }

    #[tokio::test]
    async fn test_errors_are_tool_results() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let missing = call(&mut server, 1, "habit_toggle", json!({"habit_id": "nope"})).await;
        assert_eq!(missing["result"]["isError"], json!(true));
        assert!(text(&missing).contains("Habit not found"));

        let bad_args = call(&mut server, 2, "habit_toggle", json!({})).await;
        assert_eq!(bad_args["result"]["isError"], json!(true));

        let unknown = call(&mut server, 3, "habit_explode", json!({})).await;
        assert!(text(&unknown).contains("Unknown tool"));

        let garbage = server.process_line("{not json").await.unwrap();
        let value = serde_json::to_value(garbage).unwrap();
        assert_eq!(value["error"]["code"], json!(-32700));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;
        let path = dir.path().join("habits.json");

        let created = call(&mut server, 1, "habit_create", json!({"name": "Read"})).await;
        let habit_id = created_id(&created);

        // a directory in place of the habits file makes every save fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let toggled = call(&mut server, 2, "habit_toggle", json!({"habit_id": habit_id})).await;
        assert_eq!(toggled["result"]["isError"], json!(true));
        assert!(text(&toggled).contains("Failed to write"));
        assert!(server.habit_tracker().habits()[0].completed_days.is_empty());

        let second = call(&mut server, 3, "habit_create", json!({"name": "Run"})).await;
        assert_eq!(second["result"]["isError"], json!(true));
        assert_eq!(server.habit_tracker().habits().len(), 1);

        // once the file can be written again, retrying applies the toggle once
        std::fs::remove_dir(&path).unwrap();
        let retried = call(&mut server, 4, "habit_toggle", json!({"habit_id": habit_id})).await;
        assert_eq!(retried["result"]["isError"], json!(false));
        assert_eq!(server.habit_tracker().habits()[0].completed_days.len(), 1);

        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["habits"][0]["completedDays"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_null_id_and_invalid_requests() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let ping = server
            .process_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .expect("a null id is still answered");
        let value = serde_json::to_value(ping).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["result"], json!({}));

        let not_a_request = server.process_line(r#"{"id":7,"hello":"world"}"#).await.unwrap();
        let value = serde_json::to_value(not_a_request).unwrap();
        assert_eq!(value["error"]["code"], json!(-32600));
        assert_eq!(value["id"], json!(7));
    }

    #[tokio::test]
    async fn test_theme_tools() {
        let dir = tempdir().unwrap();
        let mut server = server_in(dir.path()).await;

        let current = call(&mut server, 1, "theme_get", json!({})).await;
        assert!(text(&current).contains("light"));

        call(&mut server, 2, "theme_set", json!({"theme": "dark"})).await;
        let store = JsonPreferenceStore::new(dir.path().join("preferences.json"));
        assert_eq!(store.load_theme().await, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_legacy_document_loads() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("habits.json"),
            r#"{"habits": [{"id": "legacy", "name": "Old", "type": "count", "goalCount": null,
                "dayCounts": {"2024-01-01": 1}, "completedDays": ["2024-01-01"]}]}"#,
        )
        .unwrap();

        let server = server_in(dir.path()).await;
        let habits = server.habit_tracker().habits();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].habit_type, HabitType::Count);
        assert_eq!(habits[0].effective_goal(), 1);
        assert_eq!(compute_best_streak(&habits[0]), 1);
    }
}
