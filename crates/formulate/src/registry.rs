//! Registry of readers and writers.
//!
//! The set of dialects is closed, so the registry is a pair of static
//! slices: no registration, no locking.

use crate::config::FormulateConfig;
use crate::identifiers::Dialect;
use crate::input::{NUMEXPR_READER, ROOT_READER, TTREEFORMULA_READER};
use crate::output::{NUMEXPR_WRITER, PYTHON_WRITER, ROOT_WRITER};
use crate::traits::{Reader, TranslateError, Writer};

static READERS: [&dyn Reader; 3] = [&ROOT_READER, &NUMEXPR_READER, &TTREEFORMULA_READER];

static WRITERS: [&dyn Writer; 3] = [&ROOT_WRITER, &NUMEXPR_WRITER, &PYTHON_WRITER];

/// Get the reader for a dialect.
pub fn reader_for(dialect: Dialect) -> Option<&'static dyn Reader> {
    READERS.iter().find(|r| r.dialect() == dialect).copied()
}

/// Get the writer for a dialect.
pub fn writer_for(dialect: Dialect) -> Option<&'static dyn Writer> {
    WRITERS
        .iter()
        .find(|w| w.dialects().contains(&dialect))
        .copied()
}

/// Get a reader by dialect name (`"root"`, `"numexpr"`, ...).
pub fn reader_for_name(name: &str) -> Option<&'static dyn Reader> {
    Dialect::from_name(name).and_then(reader_for)
}

/// Get a writer by dialect name.
pub fn writer_for_name(name: &str) -> Option<&'static dyn Writer> {
    Dialect::from_name(name).and_then(writer_for)
}

/// Get all readers.
pub fn readers() -> &'static [&'static dyn Reader] {
    &READERS
}

/// Get all writers.
pub fn writers() -> &'static [&'static dyn Writer] {
    &WRITERS
}

/// Read `source` as `from` and render it as `to`.
pub fn translate(
    source: &str,
    from: Dialect,
    to: Dialect,
    config: &FormulateConfig,
) -> Result<String, TranslateError> {
    let reader = reader_for(from).ok_or(TranslateError::NoReader(from))?;
    let writer = writer_for(to).ok_or(TranslateError::NoWriter(to))?;
    let expr = reader.read_with(source, &config.lower, None)?;
    tracing::debug!(%from, %to, "translating");
    Ok(writer.write_with(&expr, &config.render, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PowerStyle;

    #[test]
    fn test_reader_lookup() {
        let reader = reader_for_name("numexpr").expect("numexpr reader");
        assert_eq!(reader.dialect(), Dialect::Numexpr);
        assert!(reader_for(Dialect::Python).is_none());
        assert_eq!(readers().len(), 3);
    }

    #[test]
    fn test_writer_lookup() {
        let writer = writer_for(Dialect::TTreeFormula).expect("ttreeformula writer");
        assert!(writer.dialects().contains(&Dialect::Root));
        assert!(writer_for_name("python").is_some());
        assert!(writer_for_name("fortran").is_none());
        assert_eq!(writers().len(), 3);
    }

    #[test]
    fn test_roundtrip_via_registry() {
        let config = FormulateConfig::default();
        assert_eq!(
            translate("a^b + 1", Dialect::Root, Dialect::Numexpr, &config).unwrap(),
            "a**b + 1"
        );

        let mut config = FormulateConfig::default();
        config.render.power = PowerStyle::Caret;
        assert_eq!(
            translate("a**b", Dialect::Numexpr, Dialect::Root, &config).unwrap(),
            "a^b"
        );

        assert_eq!(
            translate("x", Dialect::Python, Dialect::Root, &config),
            Err(TranslateError::NoReader(Dialect::Python))
        );
    }
}
