//! JavaScript wrappers the web viewer loads with plain `<script>` tags.
//!
//! `networks.js` assigns an object keyed by network name, `styles.js` an
//! array of style documents.

use crate::error::ExportError;
use serde::Serialize;
use std::io::Write;

/// Streams `var networks = {"<name>": <document>, ...};` one network at a time.
pub struct NetworksScript<W: Write> {
    writer: W,
    count: usize,
}

impl<W: Write> NetworksScript<W> {
    pub fn begin(mut writer: W) -> Result<Self, ExportError> {
        writer.write_all(b"var networks = {")?;
        Ok(Self { writer, count: 0 })
    }

    /// Append one network under its name, escaped as a JSON string key.
    pub fn push<T: Serialize>(&mut self, name: &str, document: &T) -> Result<(), ExportError> {
        if self.count > 0 {
            self.writer.write_all(b", ")?;
        }
        serde_json::to_writer(&mut self.writer, name)?;
        self.writer.write_all(b": ")?;
        serde_json::to_writer(&mut self.writer, document)?;
        self.count += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close the object literal and hand the writer back.
    pub fn finish(mut self) -> Result<W, ExportError> {
        self.writer.write_all(b"};\n")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write `var styles = [...];`.
pub fn write_styles_script<W: Write, T: Serialize>(
    mut writer: W,
    styles: &[T],
) -> Result<W, ExportError> {
    writer.write_all(b"var styles = ")?;
    serde_json::to_writer(&mut writer, styles)?;
    writer.write_all(b";\n")?;
    writer.flush()?;
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_networks_script_keys_in_order() {
        let mut script = NetworksScript::begin(Vec::new()).unwrap();
        script.push("G2", &json!({"n": 2})).unwrap();
        script.push("G1", &json!({"n": 1})).unwrap();
        assert_eq!(script.len(), 2);

        let bytes = script.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "var networks = {\"G2\": {\"n\":2}, \"G1\": {\"n\":1}};\n"
        );
    }

    #[test]
    fn test_network_names_are_escaped() {
        let mut script = NetworksScript::begin(Vec::new()).unwrap();
        script.push("say \"hi\"\\now", &json!({})).unwrap();
        let text = String::from_utf8(script.finish().unwrap()).unwrap();

        assert_eq!(text, "var networks = {\"say \\\"hi\\\"\\\\now\": {}};\n");

        let body = text
            .trim_start_matches("var networks = ")
            .trim_end_matches(";\n");
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert!(parsed.get("say \"hi\"\\now").is_some());
    }

    #[test]
    fn test_empty_networks_script() {
        let script = NetworksScript::begin(Vec::new()).unwrap();
        assert!(script.is_empty());
        let text = String::from_utf8(script.finish().unwrap()).unwrap();
        assert_eq!(text, "var networks = {};\n");
    }

    #[test]
    fn test_styles_script() {
        let bytes = write_styles_script(Vec::new(), &[json!({"title": "a"}), json!({"title": "b"})])
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "var styles = [{\"title\":\"a\"},{\"title\":\"b\"}];\n"
        );
    }
}
