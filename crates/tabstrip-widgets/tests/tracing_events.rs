//! Structured log events emitted while driving a displayer.

use std::sync::{Arc, Mutex};

use tabstrip_core::{DefaultTabDataModel, MouseButton, MouseEvent, MouseEventKind, TabData, TabId};
use tabstrip_widgets::ScrollingTabDisplayer;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

struct MessageCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for MessageCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if let Some(message) = msg.message {
            self.messages.lock().expect("capture lock").push(message);
        }
    }
}

fn displayer(n: u64) -> ScrollingTabDisplayer {
    let tabs = (0..n)
        .map(|i| TabData::new(TabId::new(i), "12345678"))
        .collect();
    let mut d = ScrollingTabDisplayer::new(DefaultTabDataModel::with_tabs(tabs).expect("ids"));
    d.set_width(250);
    d
}

fn captured(run: impl FnOnce()) -> Vec<String> {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(MessageCapture {
        messages: Arc::clone(&messages),
    });
    {
        let _guard = tracing::subscriber::set_default(subscriber);
        run();
    }
    let out = messages.lock().expect("capture lock").clone();
    out
}

#[test]
fn click_logs_state_changes_and_action() {
    let messages = captured(|| {
        let mut d = displayer(3);
        d.handle_mouse(&MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 100, 5));
        d.handle_mouse(&MouseEvent::new(MouseEventKind::Up(MouseButton::Left), 100, 5));
    });
    assert!(
        messages.iter().any(|m| m == "tabstrip.state.change"),
        "expected tabstrip.state.change in {messages:?}"
    );
    assert!(
        messages.iter().any(|m| m == "tabstrip.action"),
        "expected tabstrip.action in {messages:?}"
    );
}

#[test]
fn attention_start_and_stop_are_logged() {
    let messages = captured(|| {
        let mut d = displayer(3);
        d.add_alarm_tab(2);
        d.remove_alarm_tab(2);
    });
    let start = messages.iter().position(|m| m == "tabstrip.attention.start");
    let stop = messages.iter().position(|m| m == "tabstrip.attention.stop");
    assert!(start.is_some() && stop.is_some(), "got {messages:?}");
    assert!(start < stop);
}

#[test]
fn scrolling_logs_offset_changes() {
    let messages = captured(|| {
        let mut d = displayer(5);
        d.set_selected(Some(4));
    });
    assert!(
        messages.iter().any(|m| m == "tabstrip.layout.offset"),
        "expected tabstrip.layout.offset in {messages:?}"
    );
    assert!(messages.iter().any(|m| m == "tabstrip.layout.make_visible"));
}
