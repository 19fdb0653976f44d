//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量读取；命令行参数优先于这里的值。

use std::env;
use std::fmt;

use crate::core::{DEFAULT_REQUIRED_HEADER, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "ABSOLUTER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 抓取相关环境变量
pub mod network {
    use super::*;

    /// 请求超时（秒）
    pub struct Timeout;
    impl EnvVar<u64> for Timeout {
        const NAME: &'static str = "ABSOLUTER_TIMEOUT";
        const DEFAULT: Option<u64> = Some(DEFAULT_TIMEOUT);
        const DESCRIPTION: &'static str = "Request timeout in seconds (1-600)";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 1, 600)
        }
    }

    /// User-Agent 请求头
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "ABSOLUTER_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent header sent with every request";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_USER_AGENT.to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let user_agent = value.trim();
            if user_agent.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "User agent cannot be empty".to_string(),
                });
            }
            Ok(user_agent.to_string())
        }
    }

    /// 接受无效的 TLS 证书
    pub struct Insecure;
    impl EnvVar<bool> for Insecure {
        const NAME: &'static str = "ABSOLUTER_INSECURE";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Accept invalid TLS certificates";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 响应必须携带的头部，`none` 或空值表示不检查
    pub struct RequiredHeader;
    impl EnvVar<Option<String>> for RequiredHeader {
        const NAME: &'static str = "ABSOLUTER_REQUIRED_HEADER";
        const DEFAULT: Option<Option<String>> = None;
        const DESCRIPTION: &'static str =
            "Response header required before a page is rewritten ('none' disables the check)";

        fn get() -> EnvResult<Option<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(Some(DEFAULT_REQUIRED_HEADER.to_string())),
            }
        }

        fn parse(value: &str) -> EnvResult<Option<String>> {
            let header = value.trim().to_lowercase();
            if header.is_empty() || header == "none" {
                return Ok(None);
            }
            if !header.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_".contains(&b)) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid header name '{}'", value),
                });
            }
            Ok(Some(header))
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_u64(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    let num: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,
    pub no_color: bool,

    pub timeout: u64,
    pub user_agent: String,
    pub insecure: bool,
    pub required_header: Option<String>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            no_color: core::NoColor::get()?,

            timeout: network::Timeout::get()?,
            user_agent: network::UserAgent::get()?,
            insecure: network::Insecure::get()?,
            required_header: network::RequiredHeader::get()?,
        })
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: \"info\")\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));

    docs.push_str("\n## Network Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::Timeout::NAME,
        network::Timeout::DESCRIPTION,
        network::Timeout::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::UserAgent::NAME,
        network::UserAgent::DESCRIPTION,
        DEFAULT_USER_AGENT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::Insecure::NAME,
        network::Insecure::DESCRIPTION,
        network::Insecure::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        network::RequiredHeader::NAME,
        network::RequiredHeader::DESCRIPTION,
        DEFAULT_REQUIRED_HEADER
    ));

    docs
}
