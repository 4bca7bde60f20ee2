//! # ユーザー
//!
//! 予約者を表すエンティティ。このサービスからは読み取り専用で、
//! 予約確認メールの宛先解決にのみ使用する。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use roomres_domain::user::{Email, User, UserId};
//!
//! let user = User::new(
//!     UserId::new("U024BE7LH"),
//!     Email::new("yamada@example.com")?,
//!     "山田太郎",
//! );
//!
//! assert_eq!(user.email().as_str(), "yamada@example.com");
//! # Ok(())
//! # }
//! ```

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ユーザー ID
///
/// 外部の認証基盤が払い出す文字列 ID をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールアドレス（値オブジェクト）
///
/// デシリアライズ時も [`Email::new`] のバリデーションを通す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:    UserId,
    email: Email,
    name:  String,
}

impl User {
    pub fn new(id: UserId, email: Email, name: impl Into<String>) -> Self {
        Self {
            id,
            email,
            name: name.into(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_正しい形式のメールアドレスを受け入れる() {
        let email = Email::new("user@example.com").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[rstest]
    #[case("")]
    #[case("no-at-mark")]
    #[case("@example.com")]
    #[case("user@")]
    fn test_不正なメールアドレスを拒否する(#[case] input: &str) {
        assert!(Email::new(input).is_err());
    }

    #[test]
    fn test_255文字を超えるメールアドレスを拒否する() {
        let local = "a".repeat(250);
        let input = format!("{local}@example.com");
        assert!(Email::new(input).is_err());
    }

    #[test]
    fn test_不正なメールアドレスはデシリアライズできない() {
        let result = serde_json::from_value::<Email>(serde_json::json!("no-at-mark"));
        assert!(result.is_err());
    }

    #[test]
    fn test_メールアドレスはjsonの文字列と相互変換できる() {
        let email: Email = serde_json::from_value(serde_json::json!("user@example.com")).unwrap();
        assert_eq!(email.as_str(), "user@example.com");
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!("user@example.com")
        );
    }

    #[test]
    fn test_user_idはjsonで素の文字列になる() {
        let id = UserId::new("U024BE7LH");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("U024BE7LH"));
    }
}
