// Integration tests for the step log, subscriptions, reset and pacing

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use algotrace::algorithms::{RecursionDriver, SortingDriver};
use algotrace::config::EngineConfig;
use algotrace::engine::{CallStatus, Driver, Subscription};
use algotrace::structures::ArrayDriver;

fn sorter(values: &[i64]) -> SortingDriver {
    let mut driver = SortingDriver::with_config(&EngineConfig::instant());
    driver.set_array(values);
    driver
}

#[tokio::test]
async fn test_step_ids_are_dense() {
    let mut driver = sorter(&[9, 4, 7, 1, 8, 2]);
    driver.quick_sort().await.unwrap();

    let state = driver.get_state();
    assert!(!state.log.is_empty());
    for (expected, step) in state.log.iter().enumerate() {
        assert_eq!(step.id, expected);
    }
    assert_eq!(state.current_step(), Some(state.log.len() - 1));
}

#[tokio::test]
async fn test_snapshots_survive_later_steps() {
    let mut driver = sorter(&[3, 2, 1]);
    let early = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&early);
    let subscription = driver.subscribe(move |state| {
        if let Some(step) = state.log.current_step() {
            let mut seen = sink.borrow_mut();
            if seen.len() == step.id {
                seen.push(step.snapshot.values());
            }
        }
    });
    driver.bubble_sort().await.unwrap();
    subscription.unsubscribe();

    // Every snapshot still reads as it did when it was first published
    let state = driver.get_state();
    let seen = early.borrow();
    assert_eq!(seen.len(), state.log.len());
    for (step, values) in state.log.iter().zip(seen.iter()) {
        assert_eq!(&step.snapshot.values(), values);
    }
}

#[tokio::test]
async fn test_reset_twice_gives_same_empty_state() {
    let mut driver = sorter(&[2, 1]);
    driver.bubble_sort().await.unwrap();

    driver.reset();
    let first = driver.get_state();
    driver.reset();
    let second = driver.get_state();

    assert!(first.log.is_empty() && second.log.is_empty());
    assert_eq!(first.message, second.message);
    assert_eq!(first.is_complete, second.is_complete);
    assert!(second.solution.is_none());

    driver.bubble_sort().await.unwrap();
    assert_eq!(driver.get_state().log.get(0).map(|s| s.id), Some(0));
}

#[tokio::test]
async fn test_unsubscribe_during_notify() {
    let mut driver = ArrayDriver::with_config(&[1, 2, 3], &EngineConfig::instant());
    let calls = Rc::new(Cell::new(0));

    let handle = Rc::new(RefCell::new(None::<Subscription>));
    let counter = Rc::clone(&calls);
    let own = Rc::clone(&handle);
    let subscription = driver.subscribe(move |_| {
        counter.set(counter.get() + 1);
        if let Some(sub) = own.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    *handle.borrow_mut() = Some(subscription);

    driver.search(3).await.unwrap();
    assert_eq!(calls.get(), 1);
    assert!(driver.subscribers().is_empty());
}

#[tokio::test]
async fn test_subscribe_during_notify_starts_next_round() {
    let mut driver = ArrayDriver::with_config(&[5], &EngineConfig::instant());
    let early = Rc::new(Cell::new(0));
    let late = Rc::new(Cell::new(0));

    let registrar = driver.subscribers();
    let early_calls = Rc::clone(&early);
    let late_calls = Rc::clone(&late);
    let _first = driver.subscribe(move |_| {
        early_calls.set(early_calls.get() + 1);
        if early_calls.get() == 1 {
            let late_calls = Rc::clone(&late_calls);
            let _ = registrar.subscribe(move |_| late_calls.set(late_calls.get() + 1));
        }
    });

    driver.search(5).await.unwrap();
    assert!(early.get() >= 2);
    assert_eq!(late.get(), early.get() - 1);
}

#[tokio::test]
async fn test_recursion_tree_shape() {
    let mut driver = RecursionDriver::with_config(&EngineConfig::instant());
    assert_eq!(driver.fibonacci(4).await.unwrap(), 3);

    let state = driver.get_state();
    assert_eq!(state.log.len(), 9);

    let roots: Vec<_> = state.log.roots().collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, 0);
    assert_eq!(roots[0].level, 0);
    assert_eq!(roots[0].children.len(), 2);

    for step in state.log.iter() {
        assert_eq!(step.status, Some(CallStatus::Complete));
        if let Some(parent) = step.parent.and_then(|id| state.log.get(id)) {
            assert_eq!(step.level, parent.level + 1);
            assert!(parent.children.contains(&step.id));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_run_in_flight() {
    let mut driver = SortingDriver::with_config(&EngineConfig::default());
    driver.set_array(&[6, 5, 4, 3, 2, 1]);
    let control = driver.control();

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(1_250)).await;
        control.cancel();
    };
    let (result, ()) = tokio::join!(driver.bubble_sort(), cancel);

    assert!(result.unwrap_err().is_cancelled());
    let state = driver.get_state();
    assert!(!state.is_complete);
    assert!(state.log.len() <= 4);

    // The driver is usable again afterwards
    driver.set_delay(Duration::ZERO);
    driver.set_array(&[2, 1]);
    driver.bubble_sort().await.unwrap();
    assert_eq!(driver.values(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_delay_change_applies_mid_run() {
    let mut driver = SortingDriver::with_config(&EngineConfig::default());
    driver.set_array(&[4, 3, 2, 1]);
    let control = driver.control();

    let speed_up = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        control.set_delay(Duration::from_millis(1));
    };
    let start = tokio::time::Instant::now();
    let (result, ()) = tokio::join!(driver.bubble_sort(), speed_up);
    result.unwrap();

    // Only the first wait uses the original 500ms
    assert!(start.elapsed() < Duration::from_millis(600));
}
