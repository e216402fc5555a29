// ==========================================
// 消息本地化
// ==========================================
// rust-i18n 词条位于 locales/{th,en}.yml，占位符写作 %{name}
// i18n! 宏在 lib.rs 中注册，默认泰文
// ==========================================

/// 支持的消息语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["th", "en"];

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 切换消息语言；不支持的语言保持当前设置并返回 false
pub fn set_locale(locale: &str) -> bool {
    if !is_supported(locale) {
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 渲染词条并替换 %{name} 占位符
///
/// # 示例
/// ```no_run
/// use pt_visit_standards::i18n::t_with_args;
/// let msg = t_with_args("schedule.quota_exceeded", &[("facility", "รพ.ซับใหญ่"), ("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |message, (name, value)| {
            message.replace(&format!("%{{{}}}", name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为进程级全局状态，相关测试串行执行
    static LOCALE_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_unsupported_locale_keeps_current() {
        let _guard = LOCALE_LOCK.lock().unwrap();
        assert!(set_locale("en"));
        assert!(!set_locale("zh-CN"));
        assert_eq!(rust_i18n::locale().to_string(), "en");
        assert!(set_locale("th"));
    }

    #[test]
    fn test_placeholders_replaced_per_locale() {
        let _guard = LOCALE_LOCK.lock().unwrap();
        let args = [("facility", "รพ.ซับใหญ่"), ("count", "3")];

        set_locale("th");
        let msg = t_with_args("schedule.quota_exceeded", &args);
        assert!(msg.contains("รพ.ซับใหญ่"));
        assert!(msg.contains("3 ครั้ง"));

        set_locale("en");
        let msg = t_with_args("schedule.quota_exceeded", &args);
        assert!(msg.contains("visited 3 times"));
        assert!(!msg.contains("%{"));

        set_locale("th");
    }

    #[test]
    fn test_missing_arg_leaves_placeholder() {
        let _guard = LOCALE_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("schedule.team_size", &[("min", "3"), ("max", "5")]);
        assert!(msg.contains("3-5"));
        assert!(msg.contains("%{count}"));
        set_locale("th");
    }
}
