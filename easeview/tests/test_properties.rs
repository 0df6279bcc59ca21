use crate::common::{settle, Builder, Deliveries, Node};
use easeview::mock::ManualFactory;
use easeview::{ExecutionStatus, HostLiveness, StreamAdapter};

mod common;

fn builder(factory: &ManualFactory<u32, String>) -> Builder {
    StreamAdapter::builder(factory.clone())
}

#[tokio::test]
async fn test_idle_render_before_start() {
    let factory = ManualFactory::new();
    let adapter = builder(&factory)
        .auto_start(false)
        .idle(|_, _| Node::Idle)
        .build();
    adapter.mount().unwrap();

    assert_eq!(adapter.status(), ExecutionStatus::NotStarted);
    assert_eq!(adapter.render(&()), Node::Idle);
    assert_eq!(factory.produced(), 0);

    // the trigger handed to the idle builder starts an execution
    let captured = easeview::mock::Recorder::new();
    let idle_capture = captured.clone();
    let adapter = builder(&factory)
        .auto_start(false)
        .idle(move |_, retry| {
            idle_capture.record(retry);
            Node::Idle
        })
        .build();
    adapter.mount().unwrap();
    adapter.render(&());
    captured.calls()[0].fire();

    assert!(adapter.status().is_pending());
    assert_eq!(factory.produced(), 1);
}

#[tokio::test]
async fn test_auto_start_renders_busy() {
    let factory = ManualFactory::new();
    let adapter = builder(&factory).busy(|_| Node::Busy).build();
    adapter.mount().unwrap();

    assert_eq!(adapter.status(), ExecutionStatus::Pending);
    assert_eq!(adapter.render(&()), Node::Busy);
}

#[tokio::test]
async fn test_success_path() {
    let factory = ManualFactory::new();
    let deliveries = Deliveries::default();
    let adapter = deliveries
        .wire(builder(&factory))
        .data(|_, value| Node::Data(*value))
        .build();
    adapter.mount().unwrap();

    factory.resolve(0, 42);
    settle().await;

    assert_eq!(adapter.status(), ExecutionStatus::succeeded(42));
    assert_eq!(adapter.render(&()), Node::Data(42));
    assert_eq!(deliveries.data.calls(), vec![42]);
}

#[tokio::test]
async fn test_failure_falls_back_to_idle() {
    let factory = ManualFactory::new();
    let deliveries = Deliveries::default();
    let adapter = deliveries
        .wire(builder(&factory))
        .idle(|_, _| Node::Idle)
        .data(|_, value| Node::Data(*value))
        .build();
    adapter.mount().unwrap();

    factory.reject(0, "boom".to_string());
    settle().await;

    assert_eq!(adapter.render(&()), Node::Idle);
    assert_eq!(deliveries.error_messages(), vec!["boom".to_string()]);

    // the trigger handed to on_error restarts the execution
    let (_, retry) = deliveries.errors.calls().remove(0);
    retry.fire();
    assert!(adapter.status().is_pending());
    factory.resolve(1, 1);
    settle().await;
    assert_eq!(adapter.render(&()), Node::Data(1));
}

#[tokio::test]
async fn test_retry_supersedes_pending_execution() {
    let factory = ManualFactory::new();
    let deliveries = Deliveries::default();
    let adapter = deliveries
        .wire(builder(&factory))
        .busy(|_| Node::Busy)
        .error(|_, error, _| Node::Error(error.clone()))
        .data(|_, value| Node::Data(*value))
        .build();
    adapter.mount().unwrap();
    adapter.retry_trigger().fire();

    factory.reject(0, "stale".to_string());
    settle().await;
    assert_eq!(adapter.status(), ExecutionStatus::Pending);
    assert_eq!(adapter.render(&()), Node::Busy);
    assert!(deliveries.errors.is_empty());

    factory.resolve(1, 2);
    settle().await;
    assert_eq!(adapter.render(&()), Node::Data(2));
    assert_eq!(deliveries.data.calls(), vec![2]);
    assert!(deliveries.errors.is_empty());
}

#[tokio::test]
async fn test_liveness_gates_delivery_not_status() {
    let factory = ManualFactory::new();
    let deliveries = Deliveries::default();
    let liveness = HostLiveness::new();
    let adapter = deliveries
        .wire(builder(&factory))
        .liveness(liveness.clone())
        .error(|_, error, _| Node::Error(error.clone()))
        .build();
    adapter.mount().unwrap();

    liveness.set_foreground(false);
    factory.reject(0, "hidden".to_string());
    settle().await;

    assert_eq!(adapter.status(), ExecutionStatus::failed("hidden".to_string()));
    assert_eq!(adapter.render(&()), Node::Error("hidden".to_string()));
    assert!(deliveries.errors.is_empty());

    // back in the foreground, the next execution delivers again
    liveness.set_foreground(true);
    adapter.start().unwrap();
    factory.resolve(1, 8);
    settle().await;
    assert_eq!(deliveries.data.calls(), vec![8]);
}

#[tokio::test]
async fn test_render_is_pure() {
    let factory = ManualFactory::new();
    let adapter = builder(&factory)
        .busy(|_| Node::Busy)
        .data(|_, value| Node::Data(*value))
        .build();
    adapter.mount().unwrap();

    assert_eq!(adapter.render(&()), adapter.render(&()));
    factory.resolve(0, 4);
    settle().await;

    let first = adapter.render(&());
    let second = adapter.render(&());
    assert_eq!(first, second);
    assert_eq!(adapter.status(), ExecutionStatus::succeeded(4));
    assert_eq!(factory.produced(), 1);
}

#[tokio::test]
async fn test_no_builders_renders_placeholders() {
    let factory = ManualFactory::new();
    let adapter = builder(&factory).build();
    adapter.mount().unwrap();
    assert_eq!(adapter.render(&()), Node::Progress);

    factory.resolve(0, 1);
    settle().await;
    assert_eq!(adapter.render(&()), Node::Empty);
}
