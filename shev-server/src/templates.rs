//! Embedded page templates.

use std::sync::LazyLock;

use minijinja::{Environment, ErrorKind};
use serde::Serialize;

const LAYOUT: &str = include_str!("../templates/layout.html");
const INDEX: &str = include_str!("../templates/index.html");
const VIEW_EV: &str = include_str!("../templates/view_ev.html");
const ERROR: &str = include_str!("../templates/error.html");

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("index.html", INDEX)?;
        env.add_template("view_ev.html", VIEW_EV)?;
        env.add_template("error.html", ERROR)?;
        Ok(Templates { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

/// Templates for error responses, which are built without access to `AppState`.
static ERROR_TEMPLATES: LazyLock<Option<Templates>> = LazyLock::new(|| {
    Templates::load()
        .inspect_err(|err| tracing::error!(error = %err, "Failed to load error templates"))
        .ok()
});

/// Render the error page, for use from `IntoResponse`.
pub fn render_error(message: &str) -> Result<String, minijinja::Error> {
    let templates = ERROR_TEMPLATES.as_ref().ok_or_else(|| {
        minijinja::Error::new(ErrorKind::TemplateNotFound, "error templates failed to load")
    })?;
    templates.render("error.html", minijinja::context! { error => message })
}
