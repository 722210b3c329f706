use tokio::sync::mpsc;

/// One interaction with a rendered control, as delivered by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEvent {
    /// User who triggered the control.
    pub user_id: String,
    /// Which control was used.
    pub custom_id: String,
    /// Selected values (select menus only).
    pub values: Vec<String>,
}

impl ComponentEvent {
    pub fn select(
        user_id: impl Into<String>,
        custom_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            custom_id: custom_id.into(),
            values: vec![value.into()],
        }
    }

    pub fn button(user_id: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            custom_id: custom_id.into(),
            values: Vec::new(),
        }
    }
}

pub type EventSender = mpsc::Sender<ComponentEvent>;
pub type EventReceiver = mpsc::Receiver<ComponentEvent>;

/// Events queued for one invocation before its task consumes them.
pub const EVENT_BUFFER: usize = 16;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel(EVENT_BUFFER)
}
