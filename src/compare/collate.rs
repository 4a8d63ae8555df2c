use std::cmp::Ordering;
use std::sync::Arc;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::Locale;
use tracing::{debug, warn};

use crate::error::{ValueError, ValueResult};
use crate::meta::TypeDescriptor;

impl TypeDescriptor {
    /// Collator for this descriptor's locale and strength, built on first use.
    pub(crate) fn collator(&self) -> ValueResult<Arc<CollatorBorrowed<'static>>> {
        self.caches().collator.get_or_try_init(|| {
            let locale = self.collation_locale();
            let mut options = CollatorOptions::default();
            options.strength = Some(strength_for(self.collator_strength()));

            debug!(descriptor = %self.name(), %locale, strength = self.collator_strength(), "building collator");
            Collator::try_new((&locale).into(), options).map_err(|e| ValueError::Config {
                reason: format!("no collation data for locale {locale}: {e}"),
            })
        })
    }

    fn collation_locale(&self) -> Locale {
        let requested = self
            .collator_locale()
            .unwrap_or(self.config.collator_locale.as_str())
            .replace('_', "-");
        requested.parse::<Locale>().unwrap_or_else(|_| {
            warn!(descriptor = %self.name(), locale = %requested, "unknown collator locale, using default");
            self.config
                .collator_locale
                .replace('_', "-")
                .parse()
                .unwrap_or(Locale::UNKNOWN)
        })
    }

    /// String ordering: collator when enabled, else case-insensitive or
    /// ordinal UTF-16 order.
    pub(crate) fn compare_strings(&self, a: &str, b: &str) -> ValueResult<Ordering> {
        if !self.is_collator_disabled() {
            return Ok(self.collator()?.compare(a, b));
        }
        if self.is_case_insensitive() {
            return Ok(compare_ignore_case(a, b));
        }
        Ok(a.encode_utf16().cmp(b.encode_utf16()))
    }
}

fn strength_for(level: i32) -> Strength {
    match level {
        i32::MIN..=0 => Strength::Primary,
        1 => Strength::Secondary,
        2 => Strength::Tertiary,
        _ => Strength::Identical,
    }
}

/// Char-by-char comparison after folding each char to upper then lower case.
fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    let fold = |c: char| -> char {
        let upper = c.to_uppercase().next().unwrap_or(c);
        upper.to_lowercase().next().unwrap_or(upper)
    };
    a.chars().map(fold).cmp(b.chars().map(fold))
}
