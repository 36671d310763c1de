use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use smart_search::{
    ComputedPosition, Key, Notification, PlacementEngine, PlacementError, PlacementOptions,
    Record, Rect, SearchConfig, SearchController, Size,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
    values.into_iter().map(Record::new).collect()
}

fn fruit() -> Vec<Record> {
    records(vec![
        json!({"label": "apple"}),
        json!({"label": "avocado"}),
        json!({"label": "apricot"}),
    ])
}

fn drain(notifications: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        out.push(notification);
    }
    out
}

fn mount(controller: &mut SearchController, anchor_y: f32) {
    controller.mount(
        Rect::new(2.0, anchor_y, 40.0, 3.0),
        Size::new(40.0, 8.0),
        Rect::new(0.0, 0.0, 80.0, 24.0),
    );
}

#[derive(Debug)]
struct BrokenEngine;

impl PlacementEngine for BrokenEngine {
    fn compute_placement(
        &self,
        _anchor: Rect,
        _overlay: Size,
        _viewport: Rect,
        _options: &PlacementOptions,
    ) -> Result<ComputedPosition, PlacementError> {
        Err(PlacementError::Unavailable("overlay detached".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_multi_field_match() {
    let config = SearchConfig {
        filterable_keys: vec!["name".into(), "email".into()],
        display_key: "name".into(),
        ..SearchConfig::default()
    };
    let people = records(vec![
        json!({"name": "John Doe", "email": "j.doe@example.com"}),
        json!({"name": "Jane Smith", "email": "j.smith@example.com"}),
    ]);
    let (mut controller, _notifications) = SearchController::new(config, people);

    controller.on_input("smith");
    controller.run_for(ms(10)).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.label(0).as_deref(), Some("Jane Smith"));
    assert!(snapshot.visible);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_suppression() {
    let config = SearchConfig {
        debounce_timeout: 20,
        ..SearchConfig::default()
    };
    let (mut controller, mut notifications) = SearchController::new(config, fruit());

    controller.on_input("a");
    assert_eq!(controller.snapshot().query, "a", "text box updates immediately");
    assert!(controller.snapshot().clearable);

    controller.run_for(ms(10)).await;
    assert!(drain(&mut notifications).is_empty());
    assert!(controller.snapshot().results.is_empty());

    controller.run_for(ms(15)).await;
    assert_eq!(
        drain(&mut notifications),
        vec![Notification::InputChanged("a".into())]
    );
    assert_eq!(controller.snapshot().results.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_fires_once_with_latest_text() {
    let config = SearchConfig {
        debounce_timeout: 20,
        ..SearchConfig::default()
    };
    let (mut controller, mut notifications) = SearchController::new(config, fruit());

    for text in ["a", "ap", "apr"] {
        controller.on_input(text);
        controller.run_for(ms(10)).await;
    }
    assert!(drain(&mut notifications).is_empty());

    controller.run_for(ms(30)).await;
    assert_eq!(
        drain(&mut notifications),
        vec![Notification::InputChanged("apr".into())]
    );
    assert_eq!(controller.snapshot().results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_debounce_is_still_deferred() {
    let (mut controller, mut notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_input("apple");
    assert!(drain(&mut notifications).is_empty());
    assert!(controller.snapshot().results.is_empty());

    controller.run_for(ms(1)).await;
    assert_eq!(drain(&mut notifications).len(), 1);
    assert_eq!(controller.snapshot().results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cap() {
    let config = SearchConfig {
        max_results: 2,
        ..SearchConfig::default()
    };
    let data = fruit();
    let (mut controller, _notifications) = SearchController::new(config, data.clone());

    controller.on_input("a");
    controller.run_for(ms(1)).await;

    let results = controller.snapshot().results;
    assert_eq!(results.len(), 2);
    assert!(results[0].ptr_eq(&data[0]));
    assert!(results[1].ptr_eq(&data[1]));
}

#[tokio::test(start_paused = true)]
async fn test_no_matches() {
    let config = SearchConfig {
        no_results_text: "Nothing here".into(),
        ..SearchConfig::default()
    };
    let (mut controller, _notifications) = SearchController::new(config, fruit());

    controller.on_input("xyz");
    controller.run_for(ms(1)).await;

    let snapshot = controller.snapshot();
    assert!(snapshot.results.is_empty());
    assert!(snapshot.visible);
    assert!(snapshot.no_results);
    assert_eq!(snapshot.no_results_text, "Nothing here");
}

#[tokio::test(start_paused = true)]
async fn test_pointer_commit() {
    let data = records(vec![json!({"id": "1", "label": "Apple"}), json!({"id": "2", "label": "Banana"})]);
    let (mut controller, mut notifications) =
        SearchController::new(SearchConfig::default(), data);

    controller.on_input("apple");
    controller.run_for(ms(1)).await;
    drain(&mut notifications);

    let record = controller.snapshot().results[0].clone();
    controller.on_result_pointer_down();
    controller.on_result_activate(record.clone());
    controller.run_for(ms(300)).await;

    let selected = drain(&mut notifications);
    assert_eq!(selected.len(), 1);
    assert!(matches!(&selected[0], Notification::ResultSelected(r) if r.ptr_eq(&record)));

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query, "Apple");
    assert!(!snapshot.visible);
    assert_eq!(snapshot.highlighted, None);
}

#[tokio::test(start_paused = true)]
async fn test_blur_closes_after_grace_period() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_focus();
    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    assert!(controller.snapshot().visible);

    controller.on_blur();
    controller.run_for(ms(100)).await;
    assert!(controller.snapshot().visible, "still within grace period");

    controller.run_for(ms(150)).await;
    assert!(!controller.snapshot().visible);
}

#[tokio::test(start_paused = true)]
async fn test_click_during_blur_grace_is_not_preempted() {
    let (mut controller, mut notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_focus();
    controller.on_input("apr");
    controller.run_for(ms(1)).await;
    drain(&mut notifications);

    // Pointer press moves focus away from the input before the click lands
    controller.on_result_pointer_down();
    controller.on_blur();
    controller.run_for(ms(500)).await;
    assert!(controller.snapshot().visible);

    let record = controller.snapshot().results[0].clone();
    controller.on_result_activate(record);
    controller.run_for(ms(500)).await;

    let selected = drain(&mut notifications);
    assert_eq!(selected.len(), 1);
    assert_eq!(controller.snapshot().query, "apricot");
}

#[tokio::test(start_paused = true)]
async fn test_refocus_cancels_blur_close() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    controller.on_blur();
    controller.run_for(ms(50)).await;
    controller.on_focus();
    controller.run_for(ms(500)).await;

    assert!(controller.snapshot().visible);
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_commit_and_key_consumption() {
    let (mut controller, mut notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    assert!(!controller.on_key(Key::ArrowDown), "closed dropdown consumes nothing");

    controller.on_input("a");
    controller.run_for(ms(1)).await;
    drain(&mut notifications);

    assert!(controller.on_key(Key::ArrowDown));
    assert!(controller.on_key(Key::ArrowDown));
    assert!(!controller.on_key(Key::Other));
    assert_eq!(controller.snapshot().highlighted, Some(1));

    assert!(controller.on_key(Key::Enter));
    let selected = drain(&mut notifications);
    assert_eq!(
        selected,
        vec![Notification::ResultSelected(Record::new(json!({"label": "avocado"})))]
    );
    assert_eq!(controller.snapshot().query, "avocado");
    assert!(!controller.on_key(Key::Escape));
}

#[tokio::test(start_paused = true)]
async fn test_collection_replacement_is_immediate() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_input("ban");
    controller.run_for(ms(1)).await;
    assert!(controller.snapshot().results.is_empty());

    controller.on_collection_replaced(records(vec![json!({"label": "banana"})]));
    assert_eq!(controller.snapshot().results.len(), 1, "no debounce for data");
}

#[tokio::test(start_paused = true)]
async fn test_placement_resolves_asynchronously_and_flips() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());
    mount(&mut controller, 18.0);

    controller.on_input("a");
    assert_eq!(controller.snapshot().placement, None);
    controller.run_for(ms(1)).await;

    let placement = controller.snapshot().placement.expect("placement resolved");
    assert!(placement.flipped, "no room below the anchor");
    assert_eq!(placement.y, 10.0);
    assert_eq!(placement.x, 5.0);

    controller.on_scroll(Rect::new(10.0, 2.0, 40.0, 3.0));
    controller.run_for(ms(1)).await;
    let placement = controller.snapshot().placement.expect("placement resolved");
    assert!(!placement.flipped);
    assert_eq!((placement.x, placement.y), (10.0, 5.0));
}

#[tokio::test(start_paused = true)]
async fn test_placement_after_close_is_discarded() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());
    mount(&mut controller, 2.0);

    controller.on_input("a");
    controller.run_for(ms(1)).await;
    // Reposition requested, then closed before the engine answers
    controller.on_resize(Rect::new(0.0, 0.0, 100.0, 30.0), Rect::new(20.0, 2.0, 50.0, 3.0));
    controller.on_key(Key::Escape);
    controller.run_for(ms(1)).await;

    assert_eq!(controller.snapshot().placement, None);
    assert_eq!(
        controller.state().positioner.last_placement(),
        None,
        "placement computed before the resize is no longer valid"
    );
}

#[tokio::test(start_paused = true)]
async fn test_geometry_change_while_closed_hides_old_placement_on_reopen() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());
    mount(&mut controller, 2.0);

    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    let before = controller.snapshot().placement.expect("placement resolved");
    assert_eq!((before.x, before.y), (5.0, 5.0));

    controller.on_key(Key::Escape);
    controller.on_resize(Rect::new(0.0, 0.0, 200.0, 60.0), Rect::new(100.0, 40.0, 40.0, 3.0));
    controller.on_input("app");

    // Debounce fires and requests a new placement that has not resolved yet
    let action = controller.recv().await.expect("debounce completion");
    controller.dispatch(action);
    let snapshot = controller.snapshot();
    assert!(snapshot.visible);
    assert_eq!(snapshot.placement, None);

    controller.run_for(ms(1)).await;
    let after = controller.snapshot().placement.expect("placement resolved");
    assert_eq!((after.x, after.y), (100.0, 43.0));
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_pointer_press_does_not_block_blur_close() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_focus();
    controller.on_input("ap");
    controller.run_for(ms(1)).await;

    // Press on a row, then Escape instead of releasing on it
    controller.on_result_pointer_down();
    controller.on_key(Key::Escape);
    controller.on_input("apr");
    controller.run_for(ms(1)).await;
    assert!(controller.snapshot().visible);

    controller.on_blur();
    controller.run_for(ms(250)).await;
    let snapshot = controller.snapshot();
    assert!(!snapshot.focused);
    assert!(!snapshot.visible);
}

#[tokio::test(start_paused = true)]
async fn test_pointer_cancel_after_blur_closes_the_dropdown() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());

    controller.on_focus();
    controller.on_input("ap");
    controller.run_for(ms(1)).await;

    controller.on_result_pointer_down();
    controller.on_blur();
    controller.run_for(ms(500)).await;
    assert!(controller.snapshot().visible, "press still pending");

    controller.on_result_pointer_cancel();
    controller.run_for(ms(250)).await;
    assert!(!controller.snapshot().visible);
}

#[tokio::test(start_paused = true)]
async fn test_broken_engine_keeps_component_usable() {
    let (mut controller, mut notifications) = SearchController::with_engine(
        SearchConfig::default(),
        fruit(),
        Arc::new(BrokenEngine),
    );
    mount(&mut controller, 2.0);

    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    let snapshot = controller.snapshot();
    assert!(snapshot.visible);
    assert_eq!(snapshot.placement, None);

    controller.on_key(Key::ArrowDown);
    controller.on_key(Key::Enter);
    let selected: Vec<_> = drain(&mut notifications)
        .into_iter()
        .filter(|n| matches!(n, Notification::ResultSelected(_)))
        .collect();
    assert_eq!(selected.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_effects() {
    let config = SearchConfig {
        debounce_timeout: 50,
        ..SearchConfig::default()
    };
    let (mut controller, mut notifications) = SearchController::new(config, fruit());

    controller.on_input("ap");
    controller.on_blur();
    controller.teardown();
    controller.run_for(ms(500)).await;

    assert!(drain(&mut notifications).is_empty());
    assert!(controller.snapshot().results.is_empty());

    controller.on_input("apple");
    assert_eq!(controller.snapshot().query, "ap", "torn down controller ignores input");
}

#[tokio::test(start_paused = true)]
async fn test_disabled_is_inert() {
    let config = SearchConfig {
        disabled: true,
        ..SearchConfig::default()
    };
    let (mut controller, mut notifications) = SearchController::new(config, fruit());

    controller.on_input("ap");
    controller.on_focus();
    assert!(!controller.on_key(Key::ArrowDown));
    controller.run_for(ms(10)).await;

    assert!(drain(&mut notifications).is_empty());
    assert_eq!(controller.snapshot().query, "");

    controller.set_disabled(false);
    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    assert_eq!(controller.snapshot().results.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clear_is_synchronous() {
    let config = SearchConfig {
        debounce_timeout: 20,
        ..SearchConfig::default()
    };
    let (mut controller, mut notifications) = SearchController::new(config, fruit());

    controller.on_input("ap");
    controller.run_for(ms(25)).await;
    drain(&mut notifications);

    controller.on_input("apr");
    controller.on_clear();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.query, "");
    assert!(!snapshot.clearable);
    assert!(!snapshot.visible);
    assert!(snapshot.results.is_empty());

    controller.run_for(ms(50)).await;
    assert!(drain(&mut notifications).is_empty(), "pending debounce was canceled");
}

#[tokio::test(start_paused = true)]
async fn test_loading_defers_collection_filtering() {
    let config = SearchConfig {
        loading: true,
        ..SearchConfig::default()
    };
    let (mut controller, _notifications) = SearchController::new(config, Vec::new());

    controller.on_input("ap");
    controller.run_for(ms(1)).await;
    controller.on_collection_replaced(fruit());
    assert!(controller.snapshot().results.is_empty());
    assert!(controller.snapshot().loading);

    controller.set_loading(false);
    assert_eq!(controller.snapshot().results.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_every_transition() {
    let (mut controller, _notifications) =
        SearchController::new(SearchConfig::default(), fruit());
    let mut snapshots = controller.subscribe();

    controller.on_input("ap");
    assert!(snapshots.has_changed().unwrap());
    assert_eq!(snapshots.borrow_and_update().query, "ap");

    controller.run_for(ms(1)).await;
    assert!(snapshots.has_changed().unwrap());
    assert_eq!(snapshots.borrow_and_update().results.len(), 2);
}
