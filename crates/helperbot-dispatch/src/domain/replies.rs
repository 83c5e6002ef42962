//! Static reply texts and renderers for lookup results.

use helperbot_core::lookup::{EarthquakeReport, WeatherForecast};
use helperbot_core::reply::{QuickReplyAction, ReplyMessage};
use helperbot_core::rng::{DeterministicRng, pick_index};

/// Sent when an event fails after it was accepted.
pub const APOLOGY: &str = "エラーが発生しました。しばらくしてからもう一度お試しください。";

/// Sent when the forecast lookup fails.
pub const WEATHER_UNAVAILABLE: &str =
    "天気情報の取得に失敗しました。しばらくしてからもう一度お試しください。";
/// Sent when the earthquake lookup fails.
pub const EARTHQUAKE_UNAVAILABLE: &str =
    "地震情報の取得に失敗しました。しばらくしてからもう一度お試しください。";
/// Sent when the AI answerer fails.
pub const ANSWER_UNAVAILABLE: &str =
    "回答を取得できませんでした。しばらくしてからもう一度お試しください。";
/// Sent for a zone code that is not six ASCII digits.
pub const ZONE_FORMAT_ERROR: &str =
    "天気ゾーンは6桁の数字で指定してください。（例：天気ゾーン 130000）";
/// Confirms `通知オフ`.
pub const SILENT_ON: &str = "通知をオフにしました。";
/// Confirms `通知オン`.
pub const SILENT_OFF: &str = "通知をオンにしました。";

const FORTUNES: [&str; 5] = [
    "今日はとても良い日になりそうです！",
    "新しいことに挑戦するのに良い日です。",
    "慎重に行動することをお勧めします。",
    "思いがけない幸運が訪れるかもしれません。",
    "周りの人との協力が大切な日です。",
];

const LUCKY_COLORS: [&str; 7] = ["赤", "青", "緑", "黄", "紫", "ピンク", "オレンジ"];

const HELP_TEXT: &str = "使い方
・クイズ：クイズを始めます（クイズ終了／次のクイズ／スコア／リセット）
・天気：登録地域の天気予報
・天気ゾーン 130000：天気の地域を変更
・地震：最新の地震情報
・占い：今日の運勢
・やることリスト：一覧（追加 タスク名／削除 番号）
・通知オフ／通知オン：通知音の切り替え";

/// Draws a fortune text and a lucky color independently.
pub fn fortune(rng: &mut dyn DeterministicRng) -> Vec<ReplyMessage> {
    let text = pick_index(rng, FORTUNES.len()).map_or(FORTUNES[0], |i| FORTUNES[i]);
    let color = pick_index(rng, LUCKY_COLORS.len()).map_or(LUCKY_COLORS[0], |i| LUCKY_COLORS[i]);
    vec![
        ReplyMessage::text(format!("今日の運勢：{text}")),
        ReplyMessage::text(format!("ラッキーカラー：{color}")),
    ]
}

/// Help menu with one-tap shortcuts.
#[must_use]
pub fn help_menu() -> Vec<ReplyMessage> {
    vec![ReplyMessage::text(HELP_TEXT).with_quick_replies(
        ["クイズ", "天気", "地震", "占い", "やることリスト"]
            .into_iter()
            .map(QuickReplyAction::literal)
            .collect(),
    )]
}

/// Whether `code` is exactly six ASCII digits.
#[must_use]
pub fn is_valid_zone(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Renders an overview forecast as a header and a body.
#[must_use]
pub fn weather(forecast: &WeatherForecast) -> Vec<ReplyMessage> {
    let header = format!(
        "【{}の天気】\n{} {}発表",
        forecast.target_area, forecast.publishing_office, forecast.report_datetime
    );
    let headline = forecast.headline_text.trim();
    let body = if headline.is_empty() {
        forecast.text.trim().to_owned()
    } else {
        format!("{headline}\n\n{}", forecast.text.trim())
    };
    vec![ReplyMessage::text(header), ReplyMessage::text(body)]
}

/// Renders the latest earthquake.
#[must_use]
pub fn earthquake(report: &EarthquakeReport) -> Vec<ReplyMessage> {
    let depth = match report.depth_km {
        None => "不明".to_owned(),
        Some(0) => "ごく浅い".to_owned(),
        Some(km) => format!("約{km}km"),
    };
    let magnitude = report
        .magnitude
        .map_or_else(|| "不明".to_owned(), |m| format!("M{m:.1}"));
    vec![ReplyMessage::text(format!(
        "【最新の地震情報】\n発生時刻：{}\n震源地：{}\n最大震度：{}\n深さ：{depth}\nマグニチュード：{magnitude}",
        report.time, report.location, report.intensity
    ))]
}
