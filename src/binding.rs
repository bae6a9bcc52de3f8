/// Two-way binding between one setting and one control
///
/// Control -> setting: on a commit event the control's display is parsed by
/// the setting. Invalid input switches the control to the error style and
/// leaves the setting alone; valid input restores the normal style and is
/// written only if it differs from the current value.
///
/// Setting -> control: a listener registered on the setting rewrites the
/// display whenever the value changes, whoever changed it. The listener only
/// calls `Control::write_display`, which never commits, so updates cannot
/// loop back into the setting.
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use tracing::debug;

use crate::control::{
    CheckBox, ChoiceBox, CommitEvent, Container, Control, DisplayValue, Interactive, KeyOutcome,
    LineEdit, MultiLineEdit,
};
use crate::setting::{Bool, Setting, SettingKind, Subscription};

pub type LineBinding<K> = SettingBinding<K, LineEdit>;
pub type CheckBinding = SettingBinding<Bool, CheckBox>;
pub type ChoiceBinding<K> = SettingBinding<K, ChoiceBox>;
pub type MultiLineBinding<K> = SettingBinding<K, MultiLineEdit>;

/// Control plus the styles it switches between
struct Bound<C> {
    control: C,
    normal_style: Style,
    error_style: Style,
    in_error: bool,
}

impl<C: Control> Bound<C> {
    fn show_error(&mut self) {
        self.in_error = true;
        self.control.set_style(self.error_style);
    }

    fn clear_error(&mut self) {
        if self.in_error {
            self.in_error = false;
            self.control.set_style(self.normal_style);
        }
    }

    /// Backward path: the value is canonical, so any error mark goes too
    fn show_value(&mut self, display: C::Display) {
        self.control.write_display(display);
        self.clear_error();
    }
}

pub struct SettingBinding<K: SettingKind, C: Control> {
    name: String,
    setting: Weak<Setting<K>>,
    bound: Rc<RefCell<Bound<C>>>,
    readonly: bool,
    subscription: Option<Subscription>,
}

impl<K, C> SettingBinding<K, C>
where
    K: SettingKind,
    C: Control + 'static,
    C::Display: DisplayValue<K>,
{
    /// Bind `control` to `setting`, styling it from `parent`
    ///
    /// The control shows the setting's current value. A readonly setting
    /// makes the control non-editable and disables the commit path.
    pub fn new(setting: &Rc<Setting<K>>, mut control: C, parent: &impl Container) -> Self {
        let palette = parent.palette();
        let readonly = setting.readonly();
        let normal_style = if readonly { palette.disabled } else { palette.normal };

        control.set_style(normal_style);
        control.write_display(<C::Display as DisplayValue<K>>::render(
            setting.kind(),
            &setting.get(),
        ));
        if readonly {
            control.set_editable(false);
        }

        let bound = Rc::new(RefCell::new(Bound {
            control,
            normal_style,
            error_style: palette.error,
            in_error: false,
        }));

        let weak_bound = Rc::downgrade(&bound);
        let weak_setting = Rc::downgrade(setting);
        // redraw from the current value: a nested set() may have replaced the notified one
        let subscription = setting.add_listener(move |_: &K::Value| {
            let (Some(bound), Some(setting)) = (weak_bound.upgrade(), weak_setting.upgrade()) else {
                return;
            };
            let display = <C::Display as DisplayValue<K>>::render(setting.kind(), &setting.get());
            bound.borrow_mut().show_value(display);
        });
        debug!(
            "BINDING: {} attached with listener {}{}",
            setting.name(),
            subscription.id(),
            if readonly { " (readonly)" } else { "" }
        );

        SettingBinding {
            name: setting.name().to_string(),
            setting: Rc::downgrade(setting),
            bound,
            readonly,
            subscription: Some(subscription),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound setting, if it is still alive
    pub fn setting(&self) -> Option<Rc<Setting<K>>> {
        self.setting.upgrade()
    }

    pub fn control(&self) -> Ref<'_, C> {
        Ref::map(self.bound.borrow(), |bound| &bound.control)
    }

    /// Act on the control directly, as user input would
    ///
    /// Nothing is committed; follow with `handle_event` or `commit`.
    pub fn with_control<R>(&mut self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.bound.borrow_mut().control)
    }

    pub fn has_error(&self) -> bool {
        self.bound.borrow().in_error
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// True while the change listener is registered
    pub fn is_attached(&self) -> bool {
        self.subscription
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    /// Validate the control's display and push it into the setting
    pub fn commit(&mut self) {
        if self.readonly {
            return;
        }
        let Some(setting) = self.setting.upgrade() else {
            return;
        };

        let raw = self.bound.borrow().control.read_display();
        match <C::Display as DisplayValue<K>>::parse(setting.kind(), &raw) {
            Ok(value) => {
                self.bound.borrow_mut().clear_error();
                // no borrow of the control may be held here: set() runs our own listener
                if setting.get() != value {
                    debug!("BINDING: {} committed {:?}", self.name, value);
                    setting.set(value);
                }
            }
            Err(_) => self.bound.borrow_mut().show_error(),
        }
    }

    /// Commit if `event` is one this control commits on
    pub fn handle_event(&mut self, event: CommitEvent) -> bool {
        let commits = self.bound.borrow().control.commits_on(event);
        if commits {
            self.commit();
        }
        commits
    }

    /// Remove the change listener; safe to call more than once
    pub fn done(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.detach();
            debug!("BINDING: {} detached", self.name);
        }
    }
}

impl<K, C> SettingBinding<K, C>
where
    K: SettingKind,
    C: Control + Interactive + 'static,
    C::Display: DisplayValue<K>,
{
    /// Feed a key to the control, committing if the key completes an edit
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let outcome = self.bound.borrow_mut().control.handle_key(key);
        if let KeyOutcome::Commit(event) = outcome {
            self.handle_event(event);
        }
        outcome
    }
}

impl<K: SettingKind> SettingBinding<K, LineEdit> {
    pub fn line_edit(setting: &Rc<Setting<K>>, parent: &impl Container) -> Self {
        Self::new(setting, LineEdit::new(), parent)
    }
}

impl SettingBinding<Bool, CheckBox> {
    pub fn check_box(setting: &Rc<Setting<Bool>>, parent: &impl Container) -> Self {
        let palette = parent.palette();
        let control = CheckBox::new(palette.use_unicode).with_mark_color(palette.selection_fg);
        Self::new(setting, control, parent)
    }
}

impl<K: SettingKind> SettingBinding<K, ChoiceBox> {
    /// `options` fill the list once; `free_text` makes the box editable
    pub fn choice<I, S>(
        setting: &Rc<Setting<K>>,
        options: I,
        free_text: bool,
        parent: &impl Container,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let control =
            ChoiceBox::new(options, free_text).with_unicode(parent.palette().use_unicode);
        Self::new(setting, control, parent)
    }
}

impl<K: SettingKind> SettingBinding<K, MultiLineEdit> {
    pub fn multi_line(setting: &Rc<Setting<K>>, parent: &impl Container) -> Self {
        Self::new(setting, MultiLineEdit::new(), parent)
    }
}

/// A binding with its kinds erased, as a form holds it
pub trait BoundControl {
    fn name(&self) -> &str;
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome;
    fn focus_lost(&mut self);
    fn has_error(&self) -> bool;
    fn is_readonly(&self) -> bool;
    fn is_attached(&self) -> bool;
    fn height(&self) -> u16;
    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16;
    fn done(&mut self);
}

impl<K, C> BoundControl for SettingBinding<K, C>
where
    K: SettingKind,
    C: Control + Interactive + 'static,
    C::Display: DisplayValue<K>,
{
    fn name(&self) -> &str {
        SettingBinding::name(self)
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        SettingBinding::handle_key(self, key)
    }

    fn focus_lost(&mut self) {
        self.handle_event(CommitEvent::FocusLost);
    }

    fn has_error(&self) -> bool {
        SettingBinding::has_error(self)
    }

    fn is_readonly(&self) -> bool {
        SettingBinding::is_readonly(self)
    }

    fn is_attached(&self) -> bool {
        SettingBinding::is_attached(self)
    }

    fn height(&self) -> u16 {
        self.control().height()
    }

    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16 {
        self.control().render(area, buf, focused)
    }

    fn done(&mut self) {
        SettingBinding::done(self)
    }
}
