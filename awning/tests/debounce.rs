use std::sync::{Arc, Mutex};
use std::time::Duration;

use awning::{Autocomplete, Debounced, InputChangeHandler};

fn collector() -> (Arc<Mutex<Vec<String>>>, InputChangeHandler) {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler: InputChangeHandler = Arc::new(move |text: &str| {
        sink.lock().unwrap().push(text.to_string());
    });
    (seen, handler)
}

fn fruit_widget() -> Autocomplete<String> {
    Autocomplete::new("Fruit").with_options(vec!["apple".to_string(), "apricot".to_string()])
}

#[tokio::test(start_paused = true)]
async fn burst_collapses_to_one_delivery() {
    let (seen, handler) = collector();
    let debounced = Debounced::new(fruit_widget(), handler);

    for c in "apple".chars() {
        debounced.widget().insert_char(c);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // The visible input is never delayed, only the notification is.
    assert_eq!(debounced.widget().query(), "apple");
    assert!(debounced.is_loading());
    assert!(seen.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(seen.lock().unwrap().as_slice(), &["apple".to_string()]);
    assert!(!debounced.is_loading());
    assert!(!debounced.widget().is_loading());
}

#[tokio::test(start_paused = true)]
async fn quiet_period_restarts_on_each_keystroke() {
    let (seen, handler) = collector();
    let debounced = Debounced::new(fruit_widget(), handler);

    debounced.widget().insert_char('a');
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(seen.lock().unwrap().is_empty());

    // Arrives 250 ms in, so the first countdown never fires.
    debounced.widget().insert_char('p');
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(seen.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(seen.lock().unwrap().as_slice(), &["ap".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn custom_delay_is_honored() {
    let (seen, handler) = collector();
    let debounced =
        Debounced::new(fruit_widget(), handler).with_delay(Duration::from_millis(50));

    debounced.widget().insert_char('a');
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(seen.lock().unwrap().as_slice(), &["a".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn drop_cancels_pending_delivery() {
    let (seen, handler) = collector();
    let debounced = Debounced::new(fruit_widget(), handler);

    debounced.widget().insert_char('a');
    assert!(debounced.is_loading());
    drop(debounced);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn host_loading_is_ored_with_the_countdown() {
    let (seen, handler) = collector();
    let debounced = Debounced::new(fruit_widget(), handler);

    debounced.set_host_loading(true);
    assert!(debounced.is_loading());
    assert!(debounced.widget().is_loading());

    debounced.widget().insert_char('a');
    tokio::time::sleep(Duration::from_millis(400)).await;

    // Delivery happened, but the host is still loading.
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(debounced.is_loading());
    assert!(debounced.widget().is_loading());

    debounced.set_host_loading(false);
    assert!(!debounced.is_loading());
    assert!(!debounced.widget().is_loading());
}
