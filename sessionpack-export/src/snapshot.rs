//! Job-local snapshot of the session registries.
//!
//! The host may keep editing its session while an export runs. A job reads
//! only the snapshot it captured at start.

use crate::job::ExportMode;
use sessionpack_model::{LexiconRegistry, NetworkView, Session, VisualLexicon, VisualStyle};
use std::sync::Arc;

/// Views, styles and lexicon one export job works from.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub views: Vec<Arc<NetworkView>>,
    pub styles: Vec<Arc<VisualStyle>>,
    pub lexicon: Arc<VisualLexicon>,
}

impl SessionSnapshot {
    /// Capture the views, the styles in export order and the lexicon of the
    /// session's active renderer.
    pub fn capture(session: &Session, lexicons: &LexiconRegistry, mode: ExportMode) -> Self {
        let styles = match mode {
            ExportMode::WebSession => session.styles().to_vec(),
            ExportMode::Zipped => current_style_first(session),
        };
        Self {
            views: session.views().to_vec(),
            styles,
            lexicon: lexicons.resolve(session.renderer()),
        }
    }
}

/// The current style, then every other style once, in registration order.
pub fn current_style_first(session: &Session) -> Vec<Arc<VisualStyle>> {
    let Some(current) = session.current_style() else {
        return session.styles().to_vec();
    };
    std::iter::once(Arc::clone(current))
        .chain(
            session
                .styles()
                .iter()
                .filter(|s| !Arc::ptr_eq(s, current))
                .cloned(),
        )
        .collect()
}
