use easeview::mock::Recorder;
use easeview::{stream_factory, EaseViewStreamExt, StreamAdapter, ViewNode};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Clone, Debug, PartialEq)]
struct Record {
    id: u32,
}

#[derive(Clone, Debug, PartialEq)]
enum View {
    Busy,
    Data(Record),
    Placeholder,
}

impl ViewNode for View {
    fn empty() -> Self {
        View::Placeholder
    }

    fn progress_indicator() -> Self {
        View::Placeholder
    }
}

#[tokio::test]
async fn test_delayed_record_renders_busy_then_data() {
    let delivered: Recorder<Record> = Recorder::new();
    let on_data = delivered.clone();

    let adapter = StreamAdapter::<(), View, Record, String>::builder(|| async {
        sleep(Duration::from_millis(50)).await;
        Ok::<Record, String>(Record { id: 1 })
    })
    .busy(|_| View::Busy)
    .data(|_, record| View::Data(record.clone()))
    .on_data(move |record| on_data.record(record))
    .build();
    adapter.mount().unwrap();

    let renders: Vec<View> = adapter
        .render_signal(())
        .to_stream()
        .stop_if(|view| matches!(view, View::Data(_)))
        .collect()
        .await;

    assert_eq!(renders, vec![View::Busy, View::Data(Record { id: 1 })]);
    assert_eq!(delivered.calls(), vec![Record { id: 1 }]);
}

#[tokio::test]
async fn test_status_stream_until_complete() {
    let adapter = StreamAdapter::<(), String, u32, String>::builder(|| async {
        sleep(Duration::from_millis(20)).await;
        Err::<u32, String>("offline".to_string())
    })
    .build();
    adapter.mount().unwrap();

    let statuses: Vec<_> = adapter
        .to_stream()
        .stop_if(|status| status.is_complete())
        .collect()
        .await;

    assert_eq!(statuses.len(), 2);
    assert!(statuses[0].is_pending());
    assert_eq!(statuses[1].error_ref().map(String::as_str), Some("offline"));
}

#[tokio::test]
async fn test_multi_value_stream_only_first_counts() {
    let delivered: Recorder<u32> = Recorder::new();
    let on_data = delivered.clone();

    let adapter = StreamAdapter::<(), String, u32, String>::builder(stream_factory(|| {
        futures::stream::iter(vec![Ok(1), Ok(2), Err("later".to_string())])
    }))
    .data(|_, value| format!("value {value}"))
    .on_data(move |value| on_data.record(value))
    .build();
    adapter.mount().unwrap();

    sleep(Duration::from_millis(10)).await;

    assert_eq!(adapter.render(&()), "value 1");
    assert_eq!(delivered.calls(), vec![1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rapid_retries_settle_on_last_producer() {
    let adapter = StreamAdapter::<(), String, u32, String>::builder({
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        move || {
            let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                // earlier producers take longer
                sleep(Duration::from_millis(u64::from(50 - n * 10))).await;
                Ok::<u32, String>(n)
            }
        }
    })
    .build();
    adapter.mount().unwrap();
    let retry = adapter.retry_trigger();
    retry.fire();
    retry.fire();

    sleep(Duration::from_millis(120)).await;

    assert_eq!(adapter.status().value(), Some(2));
}
