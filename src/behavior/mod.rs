//! Behaviors and the maps that bind them to triggers
//!
//! A behavior is one of five closed kinds. The kind is decided once, when the behavior is
//! registered, and the dispatcher sorts entries into its lookup lists by a single match on
//! [`Behavior`] during a rebuild. Event handling never inspects behavior types again.
//!
//! ```text
//! InputTriggerMap: trigger ──► {names}
//! BehaviorMap:     name    ──► Behavior
//!                     │
//!                     ▼ rebuild
//!            BehaviorEntry<dyn ...> (trigger + behavior)
//! ```

pub mod maps;

pub use maps::{BehaviorMap, InputTriggerMap};

use crate::controller::component::ComponentId;
use crate::trigger::InputTrigger;
use std::fmt;
use std::sync::Arc;

/// Fires once per matching press
pub trait ClickBehavior: Send + Sync {
    fn click(&self, x: i32, y: i32);
}

/// Fires `init` on a matching press, `drag` on every motion and `end` once the trigger is
/// no longer held
pub trait DragBehavior: Send + Sync {
    fn init(&self, x: i32, y: i32);
    fn drag(&self, x: i32, y: i32);
    fn end(&self, x: i32, y: i32);
}

pub trait ScrollBehavior: Send + Sync {
    fn scroll(&self, amount: f64, is_horizontal: bool, x: i32, y: i32);
}

/// Receives controller axis values for the components it declares
///
/// Called from the controller poller thread, not the UI thread.
pub trait GamepadBehavior: Send + Sync {
    fn axes(&self) -> &[ComponentId];
    fn axis_event(&self, axis: ComponentId, value: f32);
}

impl<F> ClickBehavior for F
where
    F: Fn(i32, i32) + Send + Sync,
{
    fn click(&self, x: i32, y: i32) {
        self(x, y)
    }
}

impl<F> ScrollBehavior for F
where
    F: Fn(f64, bool, i32, i32) + Send + Sync,
{
    fn scroll(&self, amount: f64, is_horizontal: bool, x: i32, y: i32) {
        self(amount, is_horizontal, x, y)
    }
}

/// Gamepad behavior backed by a closure
struct AxisFn<F> {
    axes: Vec<ComponentId>,
    handler: F,
}

impl<F> GamepadBehavior for AxisFn<F>
where
    F: Fn(ComponentId, f32) + Send + Sync,
{
    fn axes(&self) -> &[ComponentId] {
        &self.axes
    }

    fn axis_event(&self, axis: ComponentId, value: f32) {
        (self.handler)(axis, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Click,
    Drag,
    Scroll,
    Gamepad,
    GamepadClick,
}

/// A registered behavior, tagged with its capability
#[derive(Clone)]
pub enum Behavior {
    Click(Arc<dyn ClickBehavior>),
    Drag(Arc<dyn DragBehavior>),
    Scroll(Arc<dyn ScrollBehavior>),
    Gamepad(Arc<dyn GamepadBehavior>),
    /// Click fired by controller buttons and the d-pad, bound through their key codes
    GamepadClick(Arc<dyn ClickBehavior>),
}

impl Behavior {
    pub fn click(behavior: impl ClickBehavior + 'static) -> Self {
        Behavior::Click(Arc::new(behavior))
    }

    pub fn drag(behavior: impl DragBehavior + 'static) -> Self {
        Behavior::Drag(Arc::new(behavior))
    }

    pub fn scroll(behavior: impl ScrollBehavior + 'static) -> Self {
        Behavior::Scroll(Arc::new(behavior))
    }

    pub fn gamepad(behavior: impl GamepadBehavior + 'static) -> Self {
        Behavior::Gamepad(Arc::new(behavior))
    }

    pub fn gamepad_click(behavior: impl ClickBehavior + 'static) -> Self {
        Behavior::GamepadClick(Arc::new(behavior))
    }

    /// Gamepad behavior from a closure listening on `axes`
    pub fn gamepad_fn<F>(axes: Vec<ComponentId>, handler: F) -> Self
    where
        F: Fn(ComponentId, f32) + Send + Sync + 'static,
    {
        Behavior::Gamepad(Arc::new(AxisFn { axes, handler }))
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Click(_) => BehaviorKind::Click,
            Behavior::Drag(_) => BehaviorKind::Drag,
            Behavior::Scroll(_) => BehaviorKind::Scroll,
            Behavior::Gamepad(_) => BehaviorKind::Gamepad,
            Behavior::GamepadClick(_) => BehaviorKind::GamepadClick,
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behavior::{:?}", self.kind())
    }
}

/// One trigger paired with one behavior, created fresh on every rebuild
pub struct BehaviorEntry<B: ?Sized> {
    pub trigger: InputTrigger,
    pub behavior: Arc<B>,
}

impl<B: ?Sized> BehaviorEntry<B> {
    pub fn new(trigger: InputTrigger, behavior: Arc<B>) -> Self {
        Self { trigger, behavior }
    }

    /// Same trigger bound to the same behavior instance
    ///
    /// Entries from different rebuilds are different allocations, so identity of the
    /// entry itself is not enough to recognise an already active binding.
    pub fn same_binding(&self, other: &BehaviorEntry<B>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.behavior), Arc::as_ptr(&other.behavior))
            && self.trigger == other.trigger
    }
}

impl<B: ?Sized> fmt::Debug for BehaviorEntry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorEntry")
            .field("trigger", &self.trigger.to_string())
            .finish_non_exhaustive()
    }
}

pub type ClickEntry = BehaviorEntry<dyn ClickBehavior>;
pub type DragEntry = BehaviorEntry<dyn DragBehavior>;
pub type ScrollEntry = BehaviorEntry<dyn ScrollBehavior>;
pub type GamepadEntry = BehaviorEntry<dyn GamepadBehavior>;
