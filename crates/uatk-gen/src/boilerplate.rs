//! Assembly header/footer boilerplate.
//!
//! Every test case is `header + body + footer`; only the body is
//! unit-specific. The header depends on the ISA string, the generating
//! user, and a timestamp, all carried in a [`BoilerplateContext`] so tests
//! can inject fixed values and regeneration stays byte-identical.

/// Inputs that parameterize the shared header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoilerplateContext {
    /// Target ISA string, e.g. `rv64imafdc`.
    pub isa: String,
    /// Name recorded in the generated-by banner.
    pub username: String,
    /// Timestamp recorded in the banner, `YYYY-MM-DD HH:MM:SS` (UTC).
    pub timestamp: String,
}

impl BoilerplateContext {
    /// Context for the current user and wall-clock time.
    pub fn current(isa: impl Into<String>) -> Self {
        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        BoilerplateContext {
            isa: isa.into(),
            username,
            timestamp: format_utc(secs),
        }
    }

    /// Fully explicit context, for deterministic output.
    pub fn fixed(
        isa: impl Into<String>,
        username: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        BoilerplateContext {
            isa: isa.into(),
            username: username.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Rendered header/footer pair, computed once per module and threaded down
/// to every test case.
#[derive(Debug, Clone)]
pub struct AsmBoilerplate {
    pub header: String,
    pub footer: String,
}

impl AsmBoilerplate {
    /// Render the boilerplate for one context.
    pub fn render(ctx: &BoilerplateContext) -> Self {
        let header = format!(
            "## Licensing information can be found at the LICENSE file\n\
             ## Test generated by user - {user} at {time}\n\n\
             #include \"model_test.h\"\n\
             #include \"arch_test.h\"\n\
             RVTEST_ISA(\"{isa}\")\n\n\
             .section .text.init\n\
             .globl rvtest_entry_point\n\
             rvtest_entry_point:\n\
             RVMODEL_BOOT\n\
             RVTEST_CODE_BEGIN\n\n",
            user = ctx.username,
            time = ctx.timestamp,
            isa = ctx.isa,
        );
        let footer = "\nRVTEST_CODE_END\n\
             RVMODEL_HALT\n\n\
             RVTEST_DATA_BEGIN\n\
             .align 4\n\
             rvtest_data:\n\
             .word 0xbabecafe\n\
             RVTEST_DATA_END\n\n\
             RVMODEL_DATA_BEGIN\n\
             RVMODEL_DATA_END\n"
            .to_string();
        AsmBoilerplate { header, footer }
    }

    /// Wrap a unit body into a complete test program.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}{}{}", self.header, body, self.footer)
    }
}

/// Format epoch seconds as `YYYY-MM-DD HH:MM:SS` UTC.
fn format_utc(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let tod = secs % 86_400;
    let (y, m, d) = civil_from_days(days);
    format!(
        "{y:04}-{m:02}-{d:02} {:02}:{:02}:{:02}",
        tod / 3600,
        (tod / 60) % 60,
        tod % 60
    )
}

// Civil-from-days conversion (proleptic Gregorian, day 0 = 1970-01-01).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m as u32, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_carries_isa_user_and_time() {
        let ctx = BoilerplateContext::fixed("rv64imafdc", "verifier", "2024-01-02 03:04:05");
        let bp = AsmBoilerplate::render(&ctx);
        assert!(bp.header.contains("RVTEST_ISA(\"rv64imafdc\")"));
        assert!(bp.header.contains("verifier at 2024-01-02 03:04:05"));
        assert!(bp.footer.contains("RVMODEL_HALT"));
    }

    #[test]
    fn wrap_is_header_body_footer() {
        let ctx = BoilerplateContext::fixed("rv32i", "u", "t");
        let bp = AsmBoilerplate::render(&ctx);
        let asm = bp.wrap("  nop\n");
        assert!(asm.starts_with(&bp.header));
        assert!(asm.ends_with(&bp.footer));
        assert!(asm.contains("  nop\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = BoilerplateContext::fixed("rv64i", "u", "t");
        let a = AsmBoilerplate::render(&ctx).wrap("  nop\n");
        let b = AsmBoilerplate::render(&ctx).wrap("  nop\n");
        assert_eq!(a, b);
    }

    #[test]
    fn utc_formatting() {
        assert_eq!(format_utc(0), "1970-01-01 00:00:00");
        // 2000-03-01 00:00:00 UTC
        assert_eq!(format_utc(951_868_800), "2000-03-01 00:00:00");
        // 2021-12-31 23:59:59 UTC
        assert_eq!(format_utc(1_640_995_199), "2021-12-31 23:59:59");
    }
}
