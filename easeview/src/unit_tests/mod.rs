use crate::Builders;
use std::time::Duration;


pub type TestBuilders = Builders<(), String, i32, String>;

/// Every slot configured, each rendering something recognizable.
pub fn full_builders() -> TestBuilders {
    Builders::new()
        .idle(|_, _| "idle".to_string())
        .busy(|_| "busy".to_string())
        .error(|_, error: &String, _| format!("error: {error}"))
        .data(|_, value: &i32| format!("data: {value}"))
}

/// Lets spawned settlement tasks run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
