//! Value objects

use std::fmt;

use uuid::Uuid;

/// Opaque handle of one transport session.
///
/// Generated when the WebSocket upgrade completes and dropped with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい ConnectionId を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name chosen by a participant.
///
/// Any string is accepted: no length or charset rules, and two participants
/// may share the same nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Nickname {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_generate_is_unique() {
        // テスト項目: 生成された ConnectionId は毎回異なる
        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }

    #[test]
    fn test_connection_id_display_is_uuid() {
        // テスト項目: ConnectionId の表示形式は UUID として読める
        // given (前提条件):
        let id = ConnectionId::generate();

        // when (操作):
        let displayed = id.to_string();

        // then (期待する結果):
        assert_eq!(Uuid::parse_str(&displayed).unwrap().to_string(), displayed);
    }

    #[test]
    fn test_nickname_accepts_any_string() {
        // テスト項目: Nickname は空文字列や記号を含む文字列も受け入れる
        // when (操作):
        let empty = Nickname::new("");
        let symbols = Nickname::new("🦀 <script> \"quoted\"");

        // then (期待する結果):
        assert_eq!(empty.as_str(), "");
        assert_eq!(symbols.as_str(), "🦀 <script> \"quoted\"");
    }
}
