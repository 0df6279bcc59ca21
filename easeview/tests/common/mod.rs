#![allow(dead_code)]

use easeview::mock::Recorder;
use easeview::{RetryTrigger, StreamAdapterBuilder};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: u32,
}

/// Render output of the test host: what was chosen, and with which payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Idle,
    Busy,
    Error(String),
    Data(u32),
    Empty,
    Progress,
}

impl easeview::ViewNode for Node {
    fn empty() -> Self {
        Node::Empty
    }

    fn progress_indicator() -> Self {
        Node::Progress
    }
}

pub type Builder = StreamAdapterBuilder<(), Node, u32, String>;

/// Records callback deliveries, keeping the retry triggers handed to `on_error`.
#[derive(Clone, Default)]
pub struct Deliveries {
    pub data: Recorder<u32>,
    pub errors: Recorder<(String, RetryTrigger)>,
}

impl Deliveries {
    pub fn wire(&self, builder: Builder) -> Builder {
        let data = self.data.clone();
        let errors = self.errors.clone();
        builder
            .on_data(move |value| data.record(value))
            .on_error(move |error, retry| errors.record((error, retry)))
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.calls().into_iter().map(|(error, _)| error).collect()
    }
}

pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
