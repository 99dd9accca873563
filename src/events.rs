use crate::input::KeyCode;
use crate::ring::RingName;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    Preview(RingName),
    EndPreview(RingName),
    Rebind(RingName),
    Reload,
    ConfigReload,
}
