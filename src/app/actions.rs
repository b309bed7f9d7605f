use std::path::Path;
use std::rc::Rc;

use crate::input::{resolve_shortcut, InputContext, ShortcutAction};
use crate::state::EditMode;
use crate::storage::StorageError;
use gtk4::prelude::*;
use gtk4::{gio, AlertDialog, Application, FileDialog, FileFilter};

use super::input_bridge::{normalize_shortcut_key, shortcut_modifiers};
use super::layout::MainWidgets;
use super::{refresh_controls, AppRuntime};

const DEFAULT_SAVE_NAME: &str = "screenshot.png";

fn image_filters() -> gio::ListStore {
    let images = FileFilter::new();
    images.set_name(Some("Images"));
    images.add_pixbuf_formats();
    let filters = gio::ListStore::new::<FileFilter>();
    filters.append(&images);
    filters
}

fn show_nothing_to_save(widgets: &MainWidgets) {
    let dialog = AlertDialog::builder()
        .modal(true)
        .message("Nothing to save")
        .detail("Take a screenshot or open an image first.")
        .build();
    dialog.show(Some(&widgets.window));
}

fn window_title_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open_image(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    let dialog = FileDialog::builder()
        .title("Open image")
        .modal(true)
        .filters(&image_filters())
        .build();

    let runtime = runtime.clone();
    let widgets_for_result = widgets.clone();
    dialog.open(
        Some(&widgets.window),
        gio::Cancellable::NONE,
        move |result| {
            let file = match result {
                Ok(file) => file,
                Err(err) => {
                    tracing::debug!(%err, "open dialog dismissed");
                    return;
                }
            };
            let Some(path) = file.path() else {
                tracing::warn!(uri = %file.uri(), "selected file has no local path");
                return;
            };
            if runtime.capture_running.get() {
                tracing::warn!("capture in flight; open ignored");
                return;
            }

            let canvas = match runtime.storage.load(&path) {
                Ok(canvas) => canvas,
                Err(err) => {
                    tracing::warn!(%err, "open failed; keeping current image");
                    return;
                }
            };
            match runtime.install_canvas(canvas) {
                Ok(_) => widgets_for_result
                    .window
                    .set_title(Some(&window_title_for(&path))),
                Err(err) => tracing::warn!(%err, "opened image discarded"),
            }
            refresh_controls(&runtime, &widgets_for_result);
        },
    );
}

fn save_image(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    if !runtime.has_canvas() {
        show_nothing_to_save(widgets);
        return;
    }

    let dialog = FileDialog::builder()
        .title("Save image")
        .modal(true)
        .initial_name(DEFAULT_SAVE_NAME)
        .build();
    if let Some(dir) = runtime.storage.last_save_dir().filter(|dir| dir.is_dir()) {
        dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
    }

    let runtime = runtime.clone();
    dialog.save(Some(&widgets.window), gio::Cancellable::NONE, move |result| {
        let file = match result {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!(%err, "save dialog dismissed");
                return;
            }
        };
        let Some(path) = file.path() else {
            tracing::warn!(uri = %file.uri(), "selected file has no local path");
            return;
        };
        let session = runtime.session.borrow();
        let Some(canvas) = session.canvas() else {
            return;
        };
        if let Err(err) = runtime.storage.save(canvas, &path) {
            tracing::warn!(%err, "save failed");
        }
    });
}

fn quick_save_image(runtime: &AppRuntime, widgets: &MainWidgets) {
    let result = {
        let session = runtime.session.borrow();
        runtime.storage.quick_save(session.canvas())
    };
    match result {
        Ok(path) => tracing::debug!(path = %path.display(), "quick save finished"),
        Err(StorageError::NoActiveImage) => show_nothing_to_save(widgets),
        Err(err) => tracing::warn!(%err, "quick save failed"),
    }
}

pub(super) fn install_app_actions(
    app: &Application,
    runtime: &Rc<AppRuntime>,
    widgets: &Rc<MainWidgets>,
) {
    let open = gio::SimpleAction::new("open", None);
    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        open.connect_activate(move |_, _| open_image(&runtime, &widgets));
    }

    let save = gio::SimpleAction::new("save", None);
    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        save.connect_activate(move |_, _| save_image(&runtime, &widgets));
    }

    let quick_save = gio::SimpleAction::new("quick-save", None);
    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        quick_save.connect_activate(move |_, _| quick_save_image(&runtime, &widgets));
    }

    let exit = gio::SimpleAction::new("exit", None);
    {
        let app = app.clone();
        exit.connect_activate(move |_, _| {
            tracing::info!("exit requested");
            app.quit();
        });
    }

    for action in [&open, &save, &quick_save, &exit] {
        app.add_action(action);
    }
}

pub(super) fn connect_key_shortcuts(
    app: &Application,
    runtime: &Rc<AppRuntime>,
    widgets: &Rc<MainWidgets>,
) {
    let key_controller = gtk4::EventControllerKey::new();
    let app = app.clone();
    let runtime = runtime.clone();
    let widgets_for_keys = widgets.clone();
    key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
        let Some(shortcut_key) = normalize_shortcut_key(key, keycode) else {
            return gtk4::glib::Propagation::Proceed;
        };
        let context = InputContext {
            crop_armed: runtime.session.borrow().mode() == EditMode::CropArmed,
            capture_running: runtime.capture_running.get(),
        };
        let Some(action) = resolve_shortcut(shortcut_key, shortcut_modifiers(modifier), context)
        else {
            return gtk4::glib::Propagation::Proceed;
        };

        tracing::debug!(?action, "keyboard shortcut");
        match action.action_name() {
            Some(name) => app.activate_action(name, None),
            None if action == ShortcutAction::DisarmCrop => {
                if let Err(err) = runtime.session.borrow_mut().disarm_crop() {
                    tracing::warn!(%err, "disarm ignored");
                }
                refresh_controls(&runtime, &widgets_for_keys);
            }
            None => {}
        }
        gtk4::glib::Propagation::Stop
    });
    widgets.window.add_controller(key_controller);
}
