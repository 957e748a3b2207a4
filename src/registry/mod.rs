//! Directory of certified realms the notifier may be pointed at.
//!
//! A hand-maintained allow-list: the monitored realm must resolve here or
//! startup fails. Held as a constructed value rather than a module global
//! so lookups stay testable with synthetic entries.

use crate::onchain::Pubkey;

/// Static descriptor of one certified realm.
#[derive(Debug, Clone)]
pub struct RealmInfo {
    pub symbol: String,
    pub display_name: Option<String>,
    pub program_id: Pubkey,
    pub realm_id: Pubkey,
    pub website: Option<String>,
    pub banner_image: Option<String>,
}

pub struct RealmRegistry {
    realms: Vec<RealmInfo>,
}

impl RealmRegistry {
    pub fn new(realms: Vec<RealmInfo>) -> Self {
        Self { realms }
    }

    /// The certified mainnet set. Certification is currently done through
    /// pull requests against this table.
    pub fn certified() -> Self {
        Self::new(vec![RealmInfo {
            symbol: "Dean's List Network State".to_string(),
            display_name: Some("IslandDAO".to_string()),
            program_id: "GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw"
                .parse()
                .expect("valid program address"),
            realm_id: "F9V4Lwo49aUe8fFujMbU6uhdFyDRqKY54WpzdpncUSk9"
                .parse()
                .expect("valid realm address"),
            website: Some("https://www.islanddao.org/".to_string()),
            banner_image: Some(
                "/realms/Deans_List_Network_State/banner-deanslist.png".to_string(),
            ),
        }])
    }

    /// Case-insensitive match on the realm symbol or its address.
    pub fn lookup(&self, identifier: &str) -> Option<&RealmInfo> {
        self.realms.iter().find(|realm| {
            realm.symbol.eq_ignore_ascii_case(identifier)
                || realm.realm_id.to_string().eq_ignore_ascii_case(identifier)
        })
    }
}
