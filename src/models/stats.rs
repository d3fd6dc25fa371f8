//! Store-wide statistics: concurrent players per game and online users.

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{attr, find, find_all, text};

use super::cap;

/// A row of the store stats page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub current: String,
    pub peak: String,
    pub name: String,
    pub link: Option<String>,
}

pub fn parse_player_counts(body: &str, limit: usize) -> Vec<PlayerCount> {
    let document = Html::parse_document(body);

    find_all(document.root_element(), "tr.player_count_row")
        .into_iter()
        .filter_map(|row| {
            let game = find(row, "a.gameLink")?;
            let counts = find_all(row, "span.currentServers");
            let (current, peak) = match counts.as_slice() {
                [current, peak, ..] => (text(*current), text(*peak)),
                _ => return None,
            };
            Some(PlayerCount {
                current,
                peak,
                name: text(game),
                link: attr(game, "href"),
            })
        })
        .take(cap(limit))
        .collect()
}

/// Online users over the last 48 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub min: u64,
    pub max: u64,
    pub current: u64,
}

/// Reduce `userdata.json` (`[{"data": [[timestamp, users], ...]}]`).
pub fn parse_user_stats(data: &Value) -> Option<UserStats> {
    let series = data.get(0)?.get("data")?.as_array()?;
    let counts: Vec<u64> = series
        .iter()
        .filter_map(|point| point.get(1)?.as_u64())
        .collect();

    Some(UserStats {
        min: *counts.iter().min()?,
        max: *counts.iter().max()?,
        current: *counts.last()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn player_count_rows() {
        let body = r#"<html><body><table>
            <tr class="player_count_row">
              <td><span class="currentServers">812,345</span></td>
              <td><span class="currentServers">1,234,567</span></td>
              <td><a class="gameLink" href="https://store.steampowered.com/app/730/">Counter-Strike 2</a></td>
            </tr>
            <tr class="player_count_row"><td><a class="gameLink" href="x">Broken</a></td></tr>
            <tr class="player_count_row">
              <td><span class="currentServers">500,000</span></td>
              <td><span class="currentServers">700,000</span></td>
              <td><a class="gameLink">Dota 2</a></td>
            </tr>
        </table></body></html>"#;

        let rows = parse_player_counts(body, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].current, "812,345");
        assert_eq!(rows[0].peak, "1,234,567");
        assert_eq!(rows[0].name, "Counter-Strike 2");
        assert_eq!(rows[1].link, None);
        assert_eq!(parse_player_counts(body, 1).len(), 1);
    }

    #[test]
    fn user_stats_min_max_current() {
        let data = json!([{"data": [[1, 300], [2, 100], [3, 500], [4, 250]]}]);
        assert_eq!(
            parse_user_stats(&data),
            Some(UserStats { min: 100, max: 500, current: 250 })
        );
        assert_eq!(parse_user_stats(&json!([{"data": []}])), None);
        assert_eq!(parse_user_stats(&json!({})), None);
    }
}
