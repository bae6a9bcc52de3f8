/// Typed settings with text conversion and change notification
///
/// A `Setting` is shared through `Rc` between the code that owns the value
/// and any number of bound controls. `set()` notifies every listener
/// synchronously before returning.
pub mod kind;
pub mod listeners;

pub use kind::{Bool, Choice, ColorKind, Float, Int, SettingKind, Str};
pub use listeners::{ListenerId, ListenerRegistry};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::InvalidType;

pub struct Setting<K: SettingKind> {
    name: String,
    description: String,
    kind: K,
    default: K::Value,
    value: RefCell<K::Value>,
    readonly: bool,
    listeners: RefCell<ListenerRegistry<K::Value>>,
}

impl<K: SettingKind> Setting<K> {
    pub fn new(name: impl Into<String>, kind: K, value: K::Value) -> Self {
        Setting {
            name: name.into(),
            description: String::new(),
            kind,
            default: value.clone(),
            value: RefCell::new(value),
            readonly: false,
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Finish building and share
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn get(&self) -> K::Value {
        self.value.borrow().clone()
    }

    /// Store a value and notify listeners
    ///
    /// Listeners run after the value borrow is released, so they may read
    /// the setting or call `set()` again.
    pub fn set(&self, value: K::Value) {
        *self.value.borrow_mut() = value.clone();
        debug!("SETTING: {} = {}", self.name, self.kind.to_text(&value));

        let listeners = self.listeners.borrow().snapshot();
        for listener in listeners {
            listener(&value);
        }
    }

    pub fn to_text(&self) -> String {
        self.kind.to_text(&self.value.borrow())
    }

    pub fn from_text(&self, text: &str) -> Result<K::Value, InvalidType> {
        self.kind.from_text(text)
    }

    pub fn default_value(&self) -> &K::Value {
        &self.default
    }

    pub fn is_default(&self) -> bool {
        *self.value.borrow() == self.default
    }

    /// Restore the default, notifying only if the value changes
    pub fn reset(&self) {
        if !self.is_default() {
            self.set(self.default.clone());
        }
    }

    /// Register a change listener
    ///
    /// The listener stays registered until the returned `Subscription` is
    /// detached or dropped.
    pub fn add_listener(self: &Rc<Self>, listener: impl Fn(&K::Value) + 'static) -> Subscription {
        let id = self.listeners.borrow_mut().add(Rc::new(listener));
        debug!("SETTING: {} listener {} added", self.name, id);
        let owner: Weak<dyn Unsubscribe> = Rc::downgrade(self) as Weak<dyn Unsubscribe>;
        Subscription {
            id,
            owner: Some(owner),
        }
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(id);
        if removed {
            debug!("SETTING: {} listener {} removed", self.name, id);
        }
        removed
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

trait Unsubscribe {
    fn unsubscribe(&self, id: ListenerId);
}

impl<K: SettingKind> Unsubscribe for Setting<K> {
    fn unsubscribe(&self, id: ListenerId) {
        self.remove_listener(id);
    }
}

/// Registration handle returned by `Setting::add_listener`
///
/// Removes the listener when detached or dropped. Holds only a weak
/// reference, so it never keeps the setting alive.
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    id: ListenerId,
    owner: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// True until `detach()` is called or the setting is dropped
    pub fn is_active(&self) -> bool {
        self.owner
            .as_ref()
            .map(|owner| owner.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Remove the listener now; later calls do nothing
    pub fn detach(&mut self) {
        if let Some(owner) = self.owner.take().and_then(|weak| weak.upgrade()) {
            owner.unsubscribe(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Type-erased view of a setting, used where settings of different kinds
/// are handled together (persistence, the command line)
pub trait AnySetting {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn type_name(&self) -> &'static str;
    fn readonly(&self) -> bool;
    fn is_default(&self) -> bool;
    fn to_text(&self) -> String;

    /// Parse and store text; returns whether the value changed
    fn set_text(&self, text: &str) -> Result<bool, InvalidType>;

    fn reset(&self);
}

impl<K: SettingKind> AnySetting for Setting<K> {
    fn name(&self) -> &str {
        Setting::name(self)
    }

    fn description(&self) -> &str {
        Setting::description(self)
    }

    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn readonly(&self) -> bool {
        Setting::readonly(self)
    }

    fn is_default(&self) -> bool {
        Setting::is_default(self)
    }

    fn to_text(&self) -> String {
        Setting::to_text(self)
    }

    fn set_text(&self, text: &str) -> Result<bool, InvalidType> {
        let value = self.from_text(text)?;
        if self.get() == value {
            return Ok(false);
        }
        self.set(value);
        Ok(true)
    }

    fn reset(&self) {
        Setting::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_set_notifies_with_new_value() {
        let setting = Setting::new("width", Int::default(), 1).shared();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = setting.add_listener(move |v| seen_clone.borrow_mut().push(*v));

        setting.set(5);
        setting.set(6);

        assert_eq!(*seen.borrow(), vec![5, 6]);
        assert_eq!(setting.get(), 6);
    }

    #[test]
    fn test_listener_observes_updated_setting() {
        let setting = Setting::new("title", Str, "old".to_string()).shared();
        let observed = Rc::new(RefCell::new(String::new()));
        let observed_clone = Rc::clone(&observed);
        let weak = Rc::downgrade(&setting);
        let _sub = setting.add_listener(move |_| {
            if let Some(setting) = weak.upgrade() {
                *observed_clone.borrow_mut() = setting.to_text();
            }
        });

        setting.set("new".to_string());

        assert_eq!(*observed.borrow(), "new");
    }

    #[test]
    fn test_drop_subscription_removes_listener() {
        let setting = Setting::new("flag", Bool, false).shared();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let sub = setting.add_listener(move |_| calls_clone.set(calls_clone.get() + 1));
        assert_eq!(setting.listener_count(), 1);

        drop(sub);
        setting.set(true);

        assert_eq!(setting.listener_count(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let setting = Setting::new("flag", Bool, false).shared();
        let mut sub = setting.add_listener(|_| {});
        assert!(sub.is_active());
        sub.detach();
        sub.detach();
        assert!(!sub.is_active());
        assert_eq!(setting.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_setting() {
        let setting = Setting::new("flag", Bool, false).shared();
        let sub = setting.add_listener(|_| {});
        drop(setting);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_remove_listener_by_id() {
        let setting = Setting::new("n", Int::default(), 0).shared();
        let sub = setting.add_listener(|_| {});
        assert!(setting.has_listener(sub.id()));
        assert!(setting.remove_listener(sub.id()));
        assert!(!setting.has_listener(sub.id()));
        // guard drop after manual removal is harmless
        drop(sub);
        assert_eq!(setting.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notification() {
        let setting = Setting::new("n", Int::default(), 0).shared();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot_clone = Rc::clone(&slot);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let sub = setting.add_listener(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            slot_clone.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        setting.set(1);
        setting.set(2);

        assert_eq!(calls.get(), 1);
        assert_eq!(setting.listener_count(), 0);
    }

    #[test]
    fn test_reentrant_set_from_listener() {
        let setting = Setting::new("n", Int::default(), 0).shared();
        let weak = Rc::downgrade(&setting);
        let _clamp = setting.add_listener(move |v| {
            if *v > 10 {
                if let Some(setting) = weak.upgrade() {
                    setting.set(10);
                }
            }
        });

        setting.set(50);

        assert_eq!(setting.get(), 10);
    }

    #[test]
    fn test_reset_and_default() {
        let setting = Setting::new("n", Int::default(), 3).shared();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let _sub = setting.add_listener(move |_| calls_clone.set(calls_clone.get() + 1));

        setting.reset();
        assert_eq!(calls.get(), 0);

        setting.set(9);
        assert!(!setting.is_default());
        setting.reset();
        assert!(setting.is_default());
        assert_eq!(setting.get(), 3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_any_setting_set_text() {
        let setting = Setting::new("n", Int::range(0, 5), 1).shared();
        let any: Rc<dyn AnySetting> = setting.clone();

        assert_eq!(any.set_text("4"), Ok(true));
        assert_eq!(any.set_text("4"), Ok(false));
        assert!(any.set_text("nine").is_err());
        assert_eq!(setting.get(), 4);
        assert_eq!(any.type_name(), "int");
    }
}
