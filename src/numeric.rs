//! 精确数值类型
//!
//! vacuum 报告中的数值以原始文本形式保存：整数保留完整的数字串（事务 ID
//! 计数器可能超出 32 位范围），小数保留服务器打印出的全部精度。
//! 这样输出时不会出现舍入或精度丢失。

use crate::error::ParseError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 非负整数，保存为连续的十进制数字串
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Int(String);

/// 非负小数，保存为 `digits[.digits]` 原文
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

#[inline]
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl Int {
    /// 原始数字串
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 转换为 u64，超出范围时返回 `None`
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Decimal {
    /// 原始小数文本
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Int {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_digits(s) {
            Ok(Int(s.to_string()))
        } else {
            Err(ParseError::InvalidNumber {
                kind: "integer",
                value: s.to_string(),
            })
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = match s.split_once('.') {
            Some((int, frac)) => is_digits(int) && is_digits(frac),
            None => is_digits(s),
        };

        if valid {
            Ok(Decimal(s.to_string()))
        } else {
            Err(ParseError::InvalidNumber {
                kind: "decimal",
                value: s.to_string(),
            })
        }
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Int {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_keeps_exact_digits() {
        let n: Int = "00042".parse().unwrap();
        assert_eq!(n.as_str(), "00042");
        assert_eq!(n.as_u64(), Some(42));
        assert_eq!(n.to_string(), "00042");
    }

    #[test]
    fn int_beyond_u64_is_still_valid() {
        let big = "123456789012345678901234567890";
        let n: Int = big.parse().unwrap();
        assert_eq!(n.as_str(), big);
        assert_eq!(n.as_u64(), None);
    }

    #[test]
    fn int_rejects_non_digits() {
        for bad in ["", "-1", "1.5", "12a", " 1"] {
            assert!(bad.parse::<Int>().is_err(), "Should fail for: {:?}", bad);
        }
    }

    #[test]
    fn decimal_preserves_precision() {
        let d: Decimal = "6.880".parse().unwrap();
        assert_eq!(d.to_string(), "6.880");

        let whole: Decimal = "100".parse().unwrap();
        assert_eq!(whole.as_str(), "100");
    }

    #[test]
    fn decimal_rejects_malformed() {
        for bad in ["", ".5", "5.", "1.2.3", "1,5", "abc"] {
            assert!(
                bad.parse::<Decimal>().is_err(),
                "Should fail for: {:?}",
                bad
            );
        }
    }

    #[test]
    fn serializes_as_string() {
        let d: Decimal = "19.49".parse().unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"19.49\"");
        let n: Int = "10712".parse().unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"10712\"");
    }
}
