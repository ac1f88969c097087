use chrono::NaiveDate;

use super::{Catalog, Category};

pub const SHOW_ID: &str = "oscars-2026";

const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "best_picture",
        "Best Picture",
        &[
            "Bugonia",
            "F1",
            "Frankenstein",
            "Hamnet",
            "Marty Supreme",
            "One Battle After Another",
            "The Secret Agent",
            "Sentimental Value",
            "Sinners",
            "Train Dreams",
        ],
    ),
    (
        "best_director",
        "Best Director",
        &[
            "Paul Thomas Anderson — One Battle After Another",
            "Ryan Coogler — Sinners",
            "Josh Safdie — Marty Supreme",
            "Joachim Trier — Sentimental Value",
            "Chloé Zhao — Hamnet",
        ],
    ),
    (
        "best_actor",
        "Best Actor",
        &[
            "Timothée Chalamet — Marty Supreme",
            "Leonardo DiCaprio — One Battle After Another",
            "Ethan Hawke — Blue Moon",
            "Michael B. Jordan — Sinners",
            "Wagner Moura — The Secret Agent",
        ],
    ),
    (
        "best_actress",
        "Best Actress",
        &[
            "Jessie Buckley — Hamnet",
            "Rose Byrne — If I Had Legs I'd Kick You",
            "Kate Hudson — Song Sung Blue",
            "Renate Reinsve — Sentimental Value",
            "Emma Stone — Bugonia",
        ],
    ),
    (
        "best_supporting_actor",
        "Best Supporting Actor",
        &[
            "Benicio del Toro — One Battle After Another",
            "Jacob Elordi — Frankenstein",
            "Delroy Lindo — Sinners",
            "Sean Penn — One Battle After Another",
            "Stellan Skarsgård — Sentimental Value",
        ],
    ),
    (
        "best_supporting_actress",
        "Best Supporting Actress",
        &[
            "Elle Fanning — Sentimental Value",
            "Inga Ibsdotter Lilleaas — Sentimental Value",
            "Amy Madigan — Weapons",
            "Wunmi Mosaku — Sinners",
            "Teyana Taylor — One Battle After Another",
        ],
    ),
    (
        "original_screenplay",
        "Original Screenplay",
        &[
            "Blue Moon — Robert Kaplow",
            "It Was Just an Accident — Jafar Panahi et al.",
            "Marty Supreme — Ronald Bronstein & Josh Safdie",
            "Sentimental Value — Eskil Vogt & Joachim Trier",
            "Sinners — Ryan Coogler",
        ],
    ),
    (
        "adapted_screenplay",
        "Adapted Screenplay",
        &[
            "Bugonia — Will Tracy",
            "Frankenstein — Guillermo del Toro",
            "Hamnet — Chloé Zhao & Maggie O'Farrell",
            "One Battle After Another — Paul Thomas Anderson",
            "Train Dreams",
        ],
    ),
    (
        "cinematography",
        "Cinematography",
        &[
            "Frankenstein — Dan Laustsen",
            "Marty Supreme — Darius Khondji",
            "One Battle After Another — Michael Bauman",
            "Sinners — Autumn Durald Arkapaw",
            "Train Dreams — Adolpho Veloso",
        ],
    ),
    (
        "film_editing",
        "Film Editing",
        &[
            "F1 — Stephen Mirrione",
            "Marty Supreme — Ronald Bronstein & Josh Safdie",
            "One Battle After Another — Andy Jurgensen",
            "Sentimental Value — Olivier Bugge Coutté",
            "Sinners — Michael P. Shawver",
        ],
    ),
    (
        "original_score",
        "Original Score",
        &[
            "Bugonia — Jerskin Fendrix",
            "Frankenstein — Alexandre Desplat",
            "Hamnet — Max Richter",
            "One Battle After Another — Jonny Greenwood",
            "Sinners — Ludwig Göransson",
        ],
    ),
    (
        "original_song",
        "Original Song",
        &[
            "\"Dear Me\" — Diane Warren: Relentless",
            "\"Golden\" — KPop Demon Hunters",
            "\"I Lied To You\" — Sinners",
            "\"Sweet Dreams Of Joy\" — Viva Verdi!",
            "\"Train Dreams\" — Train Dreams",
        ],
    ),
    (
        "animated_feature",
        "Animated Feature Film",
        &[
            "Arco",
            "Elio",
            "KPop Demon Hunters",
            "Little Amélie or the Character of Rain",
            "Zootopia 2",
        ],
    ),
    (
        "international_feature",
        "International Feature Film",
        &[
            "The Secret Agent (Brazil)",
            "It Was Just an Accident (France)",
            "Sentimental Value (Norway)",
            "Sirāt (Spain)",
            "The Voice of Hind Rajab (Tunisia)",
        ],
    ),
    (
        "documentary_feature",
        "Documentary Feature",
        &[
            "The Alabama Solution",
            "Come See Me in the Good Light",
            "Cutting Through Rocks",
            "Mr. Nobody Against Putin",
            "The Perfect Neighbor",
        ],
    ),
    (
        "costume_design",
        "Costume Design",
        &[
            "Avatar: Fire and Ash — Deborah L. Scott",
            "Frankenstein — Kate Hawley",
            "Hamnet — Malgosia Turzanska",
            "Marty Supreme — Miyako Bellizzi",
            "Sinners — Ruth E. Carter",
        ],
    ),
    (
        "production_design",
        "Production Design",
        &[
            "Frankenstein",
            "Hamnet",
            "Marty Supreme",
            "One Battle After Another",
            "Sinners",
        ],
    ),
    (
        "makeup_hairstyling",
        "Makeup and Hairstyling",
        &[
            "Frankenstein",
            "Kokuho",
            "Sinners",
            "The Smashing of Atoms",
            "The Ugly Stepsister",
        ],
    ),
    (
        "sound",
        "Sound",
        &["F1", "Frankenstein", "One Battle After Another", "Sinners", "Sirāt"],
    ),
    (
        "visual_effects",
        "Visual Effects",
        &[
            "Avatar: Fire and Ash",
            "F1",
            "Jurassic World Rebirth",
            "The Lost Bus",
            "Sinners",
        ],
    ),
    (
        "casting",
        "Casting",
        &[
            "Hamnet — Nina Gold",
            "Marty Supreme — Jennifer Venditti",
            "One Battle After Another — Cassandra Kulukundis",
            "The Secret Agent — Gabriel Domingues",
            "Sinners — Francine Maisler",
        ],
    ),
    (
        "animated_short",
        "Animated Short Film",
        &[
            "Butterfly",
            "Forevergreen",
            "The Girl Who Cried Pearls",
            "Retirement Plan",
            "The Three Sisters",
        ],
    ),
    (
        "live_action_short",
        "Live Action Short Film",
        &[
            "Butcher's Stain",
            "A Friend of Dorothy",
            "Jane Austen's Period Drama",
            "The Singers",
            "Two People Exchanging Saliva",
        ],
    ),
    (
        "documentary_short",
        "Documentary Short Film",
        &[
            "All the Empty Rooms",
            "Armed Only With a Camera: The Life and Death of Brent Renaud",
            "Children No More: 'Were and Are Gone'",
            "The Devil Is Busy",
            "Perfectly a Strangeness",
        ],
    ),
];

/// Ballot for the 98th Academy Awards (ceremony March 15, 2026)
pub fn catalog() -> Catalog {
    Catalog {
        id: SHOW_ID.to_string(),
        name: "98th Academy Awards".to_string(),
        ceremony: NaiveDate::from_ymd_opt(2026, 3, 15),
        categories: CATEGORIES
            .iter()
            .map(|(id, name, nominees)| Category {
                id: id.to_string(),
                name: name.to_string(),
                nominees: nominees.iter().map(|n| n.to_string()).collect(),
            })
            .collect(),
    }
}
