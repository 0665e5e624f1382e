use std::io::Write;
use std::path::Path;

use slot_machine_core::PlayerStore;
use slot_machine_shared::SpinLogEntry;

use crate::store::SqliteStore;

pub async fn view_history(
    store: &SqliteStore,
    player: Option<i64>,
    n: u32,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // a database nobody has played on yet has no tables
    store.ensure_schema().await?;
    let entries = store.recent_spins(player, i64::from(n)).await?;
    for entry in &entries {
        if json {
            writeln!(out, "{}", serde_json::to_string(entry)?)?;
        } else {
            writeln!(out, "{}", format_entry(entry))?;
        }
    }
    Ok(())
}

pub async fn export_csv(store: &SqliteStore, player: Option<i64>, path: &Path) -> anyhow::Result<usize> {
    store.ensure_schema().await?;
    let entries = store.all_spins(player).await?;
    let mut wtr = csv::Writer::from_path(path)?;
    for entry in &entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(entries.len())
}

fn format_entry(entry: &SpinLogEntry) -> String {
    let player = entry
        .player_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "#{:>6} player={} bet={} winnings={} balance={}",
        entry.id, player, entry.bet, entry.winnings, entry.balance
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_machine_shared::{Identity, SpinRecord};

    async fn seeded_store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.ensure_schema().await.unwrap();
        let id = store
            .create_player(&Identity::new("Alice", 30, "1111"))
            .await
            .unwrap();
        let mut balance = 100.0;
        for bet in [10.0, 5.5] {
            balance -= bet;
            store
                .append_spin_record(&SpinRecord {
                    player_id: id,
                    bet,
                    winnings: 0.0,
                    balance,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn history_prints_newest_first() {
        let store = seeded_store().await;
        let mut out = Vec::new();
        view_history(&store, None, 20, false, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "#     2 player=1 bet=5.5 winnings=0 balance=84.5\n#     1 player=1 bet=10 winnings=0 balance=90\n"
        );
    }

    #[tokio::test]
    async fn history_as_json_lines() {
        let store = seeded_store().await;
        let mut out = Vec::new();
        view_history(&store, Some(1), 1, true, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        let entry: SpinLogEntry = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(entry.id, 2);
        assert_eq!(entry.balance, 84.5);
    }

    #[tokio::test]
    async fn export_writes_header_and_rows() {
        let store = seeded_store().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spins.csv");
        let written = export_csv(&store, None, &path).await.unwrap();
        assert_eq!(written, 2);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "id,player_id,bet,winnings,balance\n1,1,10.0,0.0,90.0\n2,1,5.5,0.0,84.5\n"
        );
    }

    #[tokio::test]
    async fn admin_commands_work_on_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("fresh.db").display());
        let store = SqliteStore::connect(&url).await.unwrap();

        let mut out = Vec::new();
        view_history(&store, None, 20, false, &mut out).await.unwrap();
        assert!(out.is_empty());

        let path = dir.path().join("empty.csv");
        assert_eq!(export_csv(&store, None, &path).await.unwrap(), 0);
        store.close().await;
    }
}
