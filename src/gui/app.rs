use crate::config;
use crate::events::AppEvent;
use crate::geometry::{Point, Size};
use crate::gui::keys;
use crate::gui::overlay::Overlay;
use crate::gui::surface::{CairoPainter, IconCache};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::wm;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct AppModel {
    pub overlay: Rc<RefCell<Overlay>>,
    pub visible: bool,
    pub started: Instant,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Tick,
    Event(AppEvent),
    Click,
    CursorMove(Point),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        AppMsg::Event(event)
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Overlay, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("tpie"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "tpie-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[overlay = model.overlay.clone()] => move |_, key, _, _| {
                    let Some(code) = keys::key_code(key) else {
                        return glib::Propagation::Proceed;
                    };
                    let mut overlay = overlay.borrow_mut();
                    overlay.key_down(code);
                    if overlay.is_consumed(code) {
                        glib::Propagation::Stop
                    } else {
                        glib::Propagation::Proceed
                    }
                },
                connect_key_released[overlay = model.overlay.clone()] => move |_, key, _, _| {
                    if let Some(code) = keys::key_code(key) {
                        overlay.borrow_mut().key_up(code);
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "tpie-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::CursorMove(Point::new(x, y)));
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_pressed[sender, overlay = model.overlay.clone()] => move |gesture, _, _, _| {
                        match gesture.current_button() {
                            1 => sender.input(AppMsg::Click),
                            button => {
                                if let Some(code) = keys::button_code(button) {
                                    overlay.borrow_mut().key_down(code);
                                }
                            }
                        }
                    },
                    connect_released[overlay = model.overlay.clone()] => move |gesture, _, _, _| {
                        if let Some(code) = keys::button_code(gesture.current_button()) {
                            overlay.borrow_mut().key_up(code);
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (overlay, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            overlay: Rc::new(RefCell::new(overlay)),
            visible: false,
            started: Instant::now(),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let overlay_draw = model.overlay.clone();
        let icons = RefCell::new(IconCache::default());
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let overlay = overlay_draw.borrow();
                let mut icons = icons.borrow_mut();
                if let Err(e) = CairoPainter::new(cr, &mut icons, &colors).paint(overlay.display()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_tick = sender.clone();
        glib::timeout_add_local(FRAME_INTERVAL, move || {
            sender_tick.input(AppMsg::Tick);
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tick => self.tick(),
            AppMsg::Event(AppEvent::Reload | AppEvent::ConfigReload) => self.reload(),
            AppMsg::Event(event) => {
                // the overlay gets no pointer events while hidden, so sample the compositor
                if !self.visible && matches!(event, AppEvent::KeyDown(_) | AppEvent::Preview(_)) {
                    self.follow_active_monitor();
                }
                self.overlay.borrow_mut().handle(event);
            }
            AppMsg::Click => self.overlay.borrow_mut().click(),
            AppMsg::CursorMove(point) => self.overlay.borrow_mut().set_pointer(point),
        }
    }
}

impl AppModel {
    fn tick(&mut self) {
        let now = self.started.elapsed().as_secs_f64();
        let (width, height) = (self.drawing_area.width(), self.drawing_area.height());

        let mut overlay = self.overlay.borrow_mut();
        if width > 0 && height > 0 {
            overlay.set_viewport(Size::new(width as f64, height as f64));
        }

        let effects = overlay.tick(now);
        if let Some(position) = effects.warp_pointer {
            match wm::warp_cursor(position) {
                Ok(()) => overlay.set_pointer(position),
                Err(e) => log::error!("Failed to warp cursor: {}", e),
            }
        }

        let visible = overlay.is_visible();
        drop(overlay);

        self.visible = visible;
        if visible {
            self.drawing_area.queue_draw();
        }
    }

    /// Moves the overlay to the focused monitor and picks up the cursor there.
    fn follow_active_monitor(&self) {
        let mut overlay = self.overlay.borrow_mut();

        if let Some(name) = wm::get_active_monitor() {
            window::set_window_monitor(&self.root, &name);
            if let Some(size) = window::monitor_size(&name) {
                overlay.set_viewport(size);
            }
        }

        let cursor_pos = wm::get_cursor_pos_on_active_monitor()
            .or_else(|| window::get_cursor_position(&self.root));
        if let Some(position) = cursor_pos {
            overlay.set_pointer(position);
        }
    }

    fn reload(&mut self) {
        self.overlay.borrow_mut().reload(config::load_or_default());
        self.drawing_area.queue_draw();
        log::info!("Configuration reloaded");
    }
}
