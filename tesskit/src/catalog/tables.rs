//! Static language tables for the tessdata_best repository.

/// Frequently used languages, in display priority order:
/// `(code, display name, script, approximate size in bytes)`.
pub(super) static CURATED: &[(&str, &str, &str, u64)] = &[
    ("eng", "English", "Latin", 15_290_718),
    ("fra", "French", "Latin", 8_884_494),
    ("deu", "German", "Latin", 8_211_483),
    ("spa", "Spanish", "Latin", 8_879_210),
    ("ita", "Italian", "Latin", 8_880_025),
    ("por", "Portuguese", "Latin", 8_920_834),
    ("rus", "Russian", "Cyrillic", 10_673_115),
    ("jpn", "Japanese", "Japanese", 36_605_511),
    ("chi_sim", "Chinese (Simplified)", "Chinese", 44_366_453),
    ("chi_tra", "Chinese (Traditional)", "Chinese", 56_012_192),
    ("kor", "Korean", "Hangul", 12_876_003),
    ("ara", "Arabic", "Arabic", 36_435_344),
    ("hin", "Hindi", "Devanagari", 13_780_064),
    ("tha", "Thai", "Thai", 11_866_002),
    ("vie", "Vietnamese", "Latin", 9_645_872),
    ("pol", "Polish", "Latin", 10_009_085),
    ("nld", "Dutch", "Latin", 10_307_878),
    ("tur", "Turkish", "Latin", 11_436_347),
    ("heb", "Hebrew", "Hebrew", 5_454_498),
    ("swe", "Swedish", "Latin", 9_683_865),
];

/// Every code published upstream with its display name, sorted by code.
pub(super) static NAMES: &[(&str, &str)] = &[
    ("afr", "Afrikaans"),
    ("amh", "Amharic"),
    ("ara", "Arabic"),
    ("asm", "Assamese"),
    ("aze", "Azerbaijani"),
    ("aze_cyrl", "Azerbaijani (Cyrillic)"),
    ("bel", "Belarusian"),
    ("ben", "Bengali"),
    ("bod", "Tibetan"),
    ("bos", "Bosnian"),
    ("bre", "Breton"),
    ("bul", "Bulgarian"),
    ("cat", "Catalan"),
    ("ceb", "Cebuano"),
    ("ces", "Czech"),
    ("chi_sim", "Chinese (Simplified)"),
    ("chi_sim_vert", "Chinese (Simplified Vertical)"),
    ("chi_tra", "Chinese (Traditional)"),
    ("chi_tra_vert", "Chinese (Traditional Vertical)"),
    ("chr", "Cherokee"),
    ("cos", "Corsican"),
    ("cym", "Welsh"),
    ("dan", "Danish"),
    ("deu", "German"),
    ("div", "Dhivehi"),
    ("dzo", "Dzongkha"),
    ("ell", "Greek"),
    ("eng", "English"),
    ("enm", "Middle English"),
    ("epo", "Esperanto"),
    ("equ", "Math/Equations"),
    ("est", "Estonian"),
    ("eus", "Basque"),
    ("fao", "Faroese"),
    ("fas", "Persian"),
    ("fil", "Filipino"),
    ("fin", "Finnish"),
    ("fra", "French"),
    ("frk", "Frankish"),
    ("frm", "Middle French"),
    ("fry", "Frisian"),
    ("gla", "Scottish Gaelic"),
    ("gle", "Irish"),
    ("glg", "Galician"),
    ("grc", "Ancient Greek"),
    ("guj", "Gujarati"),
    ("hat", "Haitian Creole"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("hrv", "Croatian"),
    ("hun", "Hungarian"),
    ("hye", "Armenian"),
    ("iku", "Inuktitut"),
    ("ind", "Indonesian"),
    ("isl", "Icelandic"),
    ("ita", "Italian"),
    ("ita_old", "Italian (Old)"),
    ("jav", "Javanese"),
    ("jpn", "Japanese"),
    ("jpn_vert", "Japanese (Vertical)"),
    ("kan", "Kannada"),
    ("kat", "Georgian"),
    ("kat_old", "Georgian (Old)"),
    ("kaz", "Kazakh"),
    ("khm", "Khmer"),
    ("kir", "Kyrgyz"),
    ("kmr", "Kurdish (Kurmanji)"),
    ("kor", "Korean"),
    ("kor_vert", "Korean (Vertical)"),
    ("lao", "Lao"),
    ("lat", "Latin"),
    ("lav", "Latvian"),
    ("lit", "Lithuanian"),
    ("ltz", "Luxembourgish"),
    ("mal", "Malayalam"),
    ("mar", "Marathi"),
    ("mkd", "Macedonian"),
    ("mlt", "Maltese"),
    ("mon", "Mongolian"),
    ("mri", "Maori"),
    ("msa", "Malay"),
    ("mya", "Burmese"),
    ("nep", "Nepali"),
    ("nld", "Dutch"),
    ("nor", "Norwegian"),
    ("oci", "Occitan"),
    ("ori", "Odia"),
    ("osd", "Orientation Script Detection"),
    ("pan", "Punjabi"),
    ("pol", "Polish"),
    ("por", "Portuguese"),
    ("pus", "Pashto"),
    ("que", "Quechua"),
    ("ron", "Romanian"),
    ("rus", "Russian"),
    ("san", "Sanskrit"),
    ("sin", "Sinhala"),
    ("slk", "Slovak"),
    ("slv", "Slovenian"),
    ("snd", "Sindhi"),
    ("spa", "Spanish"),
    ("spa_old", "Spanish (Old)"),
    ("sqi", "Albanian"),
    ("srp", "Serbian"),
    ("srp_latn", "Serbian (Latin)"),
    ("sun", "Sundanese"),
    ("swa", "Swahili"),
    ("swe", "Swedish"),
    ("syr", "Syriac"),
    ("tam", "Tamil"),
    ("tat", "Tatar"),
    ("tel", "Telugu"),
    ("tgk", "Tajik"),
    ("tha", "Thai"),
    ("tir", "Tigrinya"),
    ("ton", "Tongan"),
    ("tur", "Turkish"),
    ("uig", "Uyghur"),
    ("ukr", "Ukrainian"),
    ("urd", "Urdu"),
    ("uzb", "Uzbek"),
    ("uzb_cyrl", "Uzbek (Cyrillic)"),
    ("vie", "Vietnamese"),
    ("yid", "Yiddish"),
    ("yor", "Yoruba"),
];
