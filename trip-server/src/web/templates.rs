//! Askama templates for the minimal HTML surface.
//!
//! The real planning UI is a separate frontend; these pages only document
//! the API and confirm the server is up.

use askama::Template;

/// Home page with the endpoint overview.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_render() {
        assert!(IndexTemplate.render().is_ok());
        assert!(AboutTemplate.render().is_ok());
    }
}
