//! Value Objects
//!
//! 識別子・表示名・時刻・楽曲パラメータ（テンポ、キー、セクション）を表す値オブジェクト。
//! いずれも不変で、検証は行わない（クライアントから届いた値をそのまま保持する）。

use std::fmt;

use uuid::Uuid;

/// 接続ごとに払い出される不透明な識別子
///
/// 表示名とは独立しており、同じ表示名の参加者が複数いても衝突しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// ConnectionId の生成器
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// ランダムな ConnectionId を生成（UUID v4）
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4())
    }
}

/// 参加者の表示名
///
/// 一意性は保証しない。空文字列も値としては受け付ける（空かどうかの判定は呼び出し側の責務）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// 未登録の接続から届いたイベントの帰属先として使う表示名
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp (milliseconds, UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// テンポ（BPM）
///
/// 範囲チェックはしない。クライアントが送った値がそのまま共有される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo(i64);

impl Tempo {
    pub const DEFAULT_BPM: i64 = 120;

    pub fn new(bpm: i64) -> Self {
        Self(bpm)
    }

    pub fn bpm(&self) -> i64 {
        self.0
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(Self::DEFAULT_BPM)
    }
}

/// キー（12 のピッチクラス）
///
/// 列挙外の文字列は `Custom` として保持し、拒否しない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Key {
    #[default]
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
    Custom(String),
}

impl Key {
    pub fn as_str(&self) -> &str {
        match self {
            Key::C => "C",
            Key::CSharp => "C#",
            Key::D => "D",
            Key::DSharp => "D#",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#",
            Key::G => "G",
            Key::GSharp => "G#",
            Key::A => "A",
            Key::ASharp => "A#",
            Key::B => "B",
            Key::Custom(symbol) => symbol,
        }
    }
}

impl From<String> for Key {
    fn from(symbol: String) -> Self {
        match symbol.as_str() {
            "C" => Key::C,
            "C#" => Key::CSharp,
            "D" => Key::D,
            "D#" => Key::DSharp,
            "E" => Key::E,
            "F" => Key::F,
            "F#" => Key::FSharp,
            "G" => Key::G,
            "G#" => Key::GSharp,
            "A" => Key::A,
            "A#" => Key::ASharp,
            "B" => Key::B,
            _ => Key::Custom(symbol),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 曲のセクション
///
/// ワイヤ上のラベルはバンドが使っている表記（`Couplet`, `Refrain`, `Pont` など）に合わせる。
/// 列挙外のラベルは `Custom` として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Intro,
    Verse,
    Chorus,
    Bridge,
    Solo,
    Outro,
    Pause,
    Custom(String),
}

impl Section {
    pub fn as_str(&self) -> &str {
        match self {
            Section::Intro => "Intro",
            Section::Verse => "Couplet",
            Section::Chorus => "Refrain",
            Section::Bridge => "Pont",
            Section::Solo => "Solo",
            Section::Outro => "Outro",
            Section::Pause => "Pause",
            Section::Custom(label) => label,
        }
    }
}

impl From<String> for Section {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Intro" => Section::Intro,
            "Couplet" => Section::Verse,
            "Refrain" => Section::Chorus,
            "Pont" => Section::Bridge,
            "Solo" => Section::Solo,
            "Outro" => Section::Outro,
            "Pause" => Section::Pause,
            _ => Section::Custom(label),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_factory_generates_distinct_ids() {
        // テスト項目: 生成される ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionIdFactory::generate();
        let id2 = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_display_name_unknown_sentinel() {
        // テスト項目: unknown() が定義済みの番兵値を返す
        // given (前提条件):

        // when (操作):
        let name = DisplayName::unknown();

        // then (期待する結果):
        assert_eq!(name.as_str(), "unknown");
    }

    #[test]
    fn test_display_name_accepts_empty_string() {
        // テスト項目: 空の表示名も値として保持できる
        // given (前提条件):

        // when (操作):
        let name = DisplayName::new("");

        // then (期待する結果):
        assert_eq!(name.as_str(), "");
    }

    #[test]
    fn test_tempo_default_is_120() {
        // テスト項目: テンポの既定値は 120 BPM
        // given (前提条件):

        // when (操作):
        let tempo = Tempo::default();

        // then (期待する結果):
        assert_eq!(tempo.bpm(), 120);
    }

    #[test]
    fn test_tempo_accepts_out_of_range_values() {
        // テスト項目: 範囲外のテンポも拒否せずに保持する
        // given (前提条件):

        // when (操作):
        let tempo = Tempo::new(-5);

        // then (期待する結果):
        assert_eq!(tempo.bpm(), -5);
    }

    #[test]
    fn test_key_parses_all_pitch_classes() {
        // テスト項目: 12 のピッチクラス記号が対応するキーに変換され、元の記号に戻る
        // given (前提条件):
        let symbols = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];

        for symbol in symbols {
            // when (操作):
            let key = Key::from(symbol.to_string());

            // then (期待する結果):
            assert!(!matches!(key, Key::Custom(_)), "{symbol} should be known");
            assert_eq!(key.as_str(), symbol);
        }
    }

    #[test]
    fn test_key_keeps_unknown_symbol_as_custom() {
        // テスト項目: 列挙外のキー記号は Custom としてそのまま保持される
        // given (前提条件):
        let symbol = "Bb".to_string();

        // when (操作):
        let key = Key::from(symbol);

        // then (期待する結果):
        assert_eq!(key, Key::Custom("Bb".to_string()));
        assert_eq!(key.to_string(), "Bb");
    }

    #[test]
    fn test_section_maps_band_labels() {
        // テスト項目: バンドのラベル表記がセクションに変換される
        // given (前提条件):

        // when (操作):
        let verse = Section::from("Couplet".to_string());
        let chorus = Section::from("Refrain".to_string());
        let bridge = Section::from("Pont".to_string());

        // then (期待する結果):
        assert_eq!(verse, Section::Verse);
        assert_eq!(chorus, Section::Chorus);
        assert_eq!(bridge, Section::Bridge);
        assert_eq!(verse.as_str(), "Couplet");
    }

    #[test]
    fn test_section_keeps_unknown_label_as_custom() {
        // テスト項目: 列挙外のセクションラベルは Custom として保持される
        // given (前提条件):

        // when (操作):
        let section = Section::from("Coda".to_string());

        // then (期待する結果):
        assert_eq!(section, Section::Custom("Coda".to_string()));
        assert_eq!(section.as_str(), "Coda");
    }
}
