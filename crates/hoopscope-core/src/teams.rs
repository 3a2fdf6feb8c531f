// Fixed catalog of the 30 NBA franchises.
//
// Teams are static reference data: the catalog is built at compile time and
// never mutated. Everything else in the workspace refers to a team through a
// `&'static Team` borrowed from `ALL_TEAMS`.

/// One NBA franchise.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Team {
    /// Stable three-letter identifier (e.g. "LAL").
    pub id: &'static str,
    /// Short nickname (e.g. "Lakers").
    pub name: &'static str,
    pub city: &'static str,
    /// Display name used in prompts (e.g. "Los Angeles Lakers").
    pub full_name: &'static str,
    /// Logo asset reference.
    pub logo: &'static str,
}

impl Team {
    const fn new(
        id: &'static str,
        name: &'static str,
        city: &'static str,
        full_name: &'static str,
        logo: &'static str,
    ) -> Self {
        Team {
            id,
            name,
            city,
            full_name,
            logo,
        }
    }

    /// "City Name" as shown in pickers. Usually identical to `full_name`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

pub static ALL_TEAMS: [Team; 30] = [
    Team::new("ATL", "Hawks", "Atlanta", "Atlanta Hawks", "nba-atlanta-hawks-logo"),
    Team::new("BOS", "Celtics", "Boston", "Boston Celtics", "nba-boston-celtics-logo"),
    Team::new("BKN", "Nets", "Brooklyn", "Brooklyn Nets", "nba-brooklyn-nets-logo"),
    Team::new("CHA", "Hornets", "Charlotte", "Charlotte Hornets", "nba-charlotte-hornets-logo"),
    Team::new("CHI", "Bulls", "Chicago", "Chicago Bulls", "nba-chicago-bulls-logo"),
    Team::new("CLE", "Cavaliers", "Cleveland", "Cleveland Cavaliers", "nba-cleveland-cavaliers-logo"),
    Team::new("DAL", "Mavericks", "Dallas", "Dallas Mavericks", "nba-dallas-mavericks-logo"),
    Team::new("DEN", "Nuggets", "Denver", "Denver Nuggets", "nba-denver-nuggets-logo"),
    Team::new("DET", "Pistons", "Detroit", "Detroit Pistons", "nba-detroit-pistons-logo"),
    Team::new("GSW", "Warriors", "Golden State", "Golden State Warriors", "nba-golden-state-warriors-logo"),
    Team::new("HOU", "Rockets", "Houston", "Houston Rockets", "nba-houston-rockets-logo"),
    Team::new("IND", "Pacers", "Indiana", "Indiana Pacers", "nba-indiana-pacers-logo"),
    Team::new("LAC", "Clippers", "Los Angeles", "Los Angeles Clippers", "nba-los-angeles-clippers-logo"),
    Team::new("LAL", "Lakers", "Los Angeles", "Los Angeles Lakers", "nba-los-angeles-lakers-logo"),
    Team::new("MEM", "Grizzlies", "Memphis", "Memphis Grizzlies", "nba-memphis-grizzlies-logo"),
    Team::new("MIA", "Heat", "Miami", "Miami Heat", "nba-miami-heat-logo"),
    Team::new("MIL", "Bucks", "Milwaukee", "Milwaukee Bucks", "nba-milwaukee-bucks-logo"),
    Team::new("MIN", "Timberwolves", "Minnesota", "Minnesota Timberwolves", "nba-minnesota-timberwolves-logo"),
    Team::new("NOP", "Pelicans", "New Orleans", "New Orleans Pelicans", "nba-new-orleans-pelicans-logo"),
    Team::new("NYK", "Knicks", "New York", "New York Knicks", "nba-new-york-knicks-logo"),
    Team::new("OKC", "Thunder", "Oklahoma City", "Oklahoma City Thunder", "nba-oklahoma-city-thunder-logo"),
    Team::new("ORL", "Magic", "Orlando", "Orlando Magic", "nba-orlando-magic-logo"),
    Team::new("PHI", "76ers", "Philadelphia", "Philadelphia 76ers", "nba-philadelphia-76ers-logo"),
    Team::new("PHX", "Suns", "Phoenix", "Phoenix Suns", "nba-phoenix-suns-logo"),
    Team::new("POR", "Trail Blazers", "Portland", "Portland Trail Blazers", "nba-portland-trail-blazers-logo"),
    Team::new("SAC", "Kings", "Sacramento", "Sacramento Kings", "nba-sacramento-kings-logo"),
    Team::new("SAS", "Spurs", "San Antonio", "San Antonio Spurs", "nba-san-antonio-spurs-logo"),
    Team::new("TOR", "Raptors", "Toronto", "Toronto Raptors", "nba-toronto-raptors-logo"),
    Team::new("UTA", "Jazz", "Utah", "Utah Jazz", "nba-utah-jazz-logo"),
    Team::new("WAS", "Wizards", "Washington", "Washington Wizards", "nba-washington-wizards-logo"),
];

/// Look up a team by its identifier (case-insensitive).
pub fn find_team(id: &str) -> Option<&'static Team> {
    ALL_TEAMS.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Filter the catalog by a free-text query matched against the nickname and
/// the city. An empty (or whitespace-only) query returns every team.
pub fn search_teams(query: &str) -> Vec<&'static Team> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return ALL_TEAMS.iter().collect();
    }
    ALL_TEAMS
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle) || t.city.to_lowercase().contains(&needle)
        })
        .collect()
}
