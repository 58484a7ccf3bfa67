//! Shared test fixture: a small but realistic registry snapshot
//! exercising the snapshot load path, including a presiding officer,
//! a deputy, a nickname collision, and a portfolio reshuffle.

use std::sync::Arc;

use chamber::Registry;

/// Snapshot JSON for a miniature parliament.
#[must_use]
pub fn snapshot_json() -> String {
    serde_json::json!({
        "metadata": {
            "version": "1.4.2",
            "parliament": "14th Parliament",
            "parliament_start": "2021-10-06",
            "total_seats": 39,
            "last_updated": "2024-02-01",
            "compiled_by": "curation team",
            "source_document": "official gazette"
        },
        "members": [
            {
                "id": "mp_davis_brave",
                "full_name": "Philip Edward Davis, K.C.",
                "common_name": "Brave Davis",
                "party": "PLP",
                "constituency": "Cat Island, Rum Cay and San Salvador",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [{
                    "title": "Prime Minister and Minister of Finance",
                    "short_title": "Prime Minister",
                    "start_date": "2021-09-17",
                    "end_date": null
                }],
                "aliases": ["Brave Davis", "Brave", "Davis"]
            },
            {
                "id": "mp_cooper_chester",
                "full_name": "I. Chester Cooper",
                "common_name": "Chester Cooper",
                "party": "PLP",
                "constituency": "The Exumas and Ragged Island",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [{
                    "title": "Deputy Prime Minister and Minister of Tourism",
                    "short_title": "Deputy Prime Minister",
                    "start_date": "2021-09-17",
                    "end_date": null
                }],
                "aliases": ["Chester Cooper", "Cooper"]
            },
            {
                "id": "mp_mitchell_fred",
                "full_name": "Frederick Audley Mitchell",
                "common_name": "Fred Mitchell",
                "party": "PLP",
                "constituency": "Fox Hill",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [{
                    "title": "Minister of Foreign Affairs and Public Service",
                    "short_title": "Minister of Foreign Affairs",
                    "start_date": "2021-09-17",
                    "end_date": null
                }],
                "aliases": ["Fred Mitchell", "Mitchell"]
            },
            {
                "id": "mp_minnis_hubert",
                "full_name": "Hubert Alexander Minnis",
                "common_name": "Hubert Minnis",
                "party": "FNM",
                "constituency": "Killarney",
                "is_opposition_frontbench": true,
                "kind": "debater",
                "seat_status": "active",
                "aliases": ["Hubert Minnis", "Minnis", "Doc"]
            },
            {
                "id": "mp_darville_michael",
                "full_name": "Michael Ronald Darville",
                "common_name": "Michael Darville",
                "party": "PLP",
                "constituency": "Pineridge",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [{
                    "title": "Minister of Health and Wellness",
                    "short_title": "Minister of Health",
                    "start_date": "2021-09-17",
                    "end_date": null
                }],
                "aliases": ["Michael Darville", "Darville", "Doc"]
            },
            {
                "id": "mp_sears_alfred",
                "full_name": "Alfred Michael Sears, K.C.",
                "common_name": "Alfred Sears",
                "party": "PLP",
                "constituency": "Fort Charlotte",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [
                    {
                        "title": "Minister of Works and Utilities",
                        "short_title": "Minister of Works",
                        "start_date": "2021-09-17",
                        "end_date": "2023-09-03"
                    },
                    {
                        "title": "Minister of Immigration and National Insurance",
                        "short_title": "Minister of Immigration",
                        "start_date": "2023-09-04",
                        "end_date": null
                    }
                ],
                "aliases": ["Alfred Sears", "Sears"]
            },
            {
                "id": "mp_sweeting_clay",
                "full_name": "Clay Glenroy Sweeting",
                "common_name": "Clay Sweeting",
                "party": "PLP",
                "constituency": "Central and South Eleuthera",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [
                    {
                        "title": "Minister of Agriculture and Marine Resources",
                        "short_title": "Minister of Agriculture",
                        "start_date": "2021-09-17",
                        "end_date": "2023-09-03"
                    },
                    {
                        "title": "Minister of Works and Family Island Affairs",
                        "short_title": "Minister of Works",
                        "start_date": "2023-09-04",
                        "end_date": null
                    }
                ],
                "aliases": ["Clay Sweeting", "Sweeting"]
            },
            {
                "id": "mp_munroe_wayne",
                "full_name": "Wayne Rolford Munroe, K.C.",
                "common_name": "Wayne Munroe",
                "party": "PLP",
                "constituency": "Freetown",
                "is_cabinet": true,
                "kind": "debater",
                "seat_status": "active",
                "portfolios": [{
                    "title": "Minister of National Security",
                    "short_title": "Minister of National Security",
                    "start_date": "2021-09-17",
                    "end_date": null
                }],
                "aliases": ["Wayne Munroe", "Munroe"]
            },
            {
                "id": "mp_deveaux_patricia",
                "full_name": "Patricia Deveaux",
                "common_name": "Patricia Deveaux",
                "party": "PLP",
                "constituency": "Bamboo Town",
                "kind": "control",
                "seat_status": "active",
                "aliases": ["Patricia Deveaux", "Madam Speaker"],
                "special_roles": ["Speaker of the House"]
            },
            {
                "id": "mp_moxey_sylvanus",
                "full_name": "Sylvanus Moxey",
                "common_name": "Sylvanus Moxey",
                "party": "PLP",
                "constituency": "West Grand Bahama",
                "kind": "control",
                "seat_status": "active",
                "aliases": ["Sylvanus Moxey"],
                "special_roles": ["Deputy Speaker"]
            }
        ],
        "deceased_members": [],
        "alias_collisions": [{
            "alias": "Doc",
            "claimants": ["mp_darville_michael", "mp_minnis_hubert"],
            "resolution_strategy": "context decides; Darville in health debates, Minnis in opposition replies"
        }],
        "geographic_index": {
            "new_providence": ["Fox Hill", "Killarney", "Fort Charlotte", "Bamboo Town", "Pineridge"],
            "family_islands": ["Cat Island, Rum Cay and San Salvador", "The Exumas and Ragged Island", "Central and South Eleuthera", "Freetown"]
        }
    })
    .to_string()
}

/// Load the fixture registry through the public snapshot path.
#[must_use]
pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::from_json_str(&snapshot_json()).expect("fixture snapshot must validate"))
}
