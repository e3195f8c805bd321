//! Built-in voice catalogs.

use serde::Serialize;

use crate::job::JobKind;

/// Display name used when a voice id is not in its catalog.
pub const FALLBACK_VOICE_NAME: &str = "AI Voice";

/// A selectable voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub age: &'static str,
    /// Speaking style or category
    pub style: &'static str,
    /// ISO 639-1 language code, empty for language-independent voices
    pub language: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub sample_url: &'static str,
}

const SAMPLE_MOZART: &str = "https://ia802508.us.archive.org/28/items/cd_mozart-piano-sonatas_wolfgang-amadeus-mozart-lili-kraus/disc1/01.11-PianoSonataInC-MajorK.545-1.Allegro_sample.mp3";
const SAMPLE_BACH: &str = "https://ia800501.us.archive.org/11/items/cd_j-s-bach-the-two-part-inventions_glenn-gould/disc1/01.J.S.BachInventionNo.1InC-MajorBwv772_sample.mp3";
const SAMPLE_BEETHOVEN: &str = "https://ia902606.us.archive.org/13/items/cd_beethoven-piano-sonatas_wilhelm-kempff/disc1/01.PianoSonataNo.8InC-MinorOp.13Pathetique-1.Grave-AllegroDiMoltoEConBrio_sample.mp3";
const SAMPLE_TEST: &str = "https://archive.org/download/test-mp3-file/test.mp3";

/// Sample media locators, also used by the simulated backend.
pub const SAMPLE_MEDIA_URLS: [&str; 4] = [SAMPLE_MOZART, SAMPLE_BACH, SAMPLE_BEETHOVEN, SAMPLE_TEST];

const fn voice(
    id: &'static str,
    name: &'static str,
    gender: &'static str,
    age: &'static str,
    style: &'static str,
    language: &'static str,
    sample_url: &'static str,
) -> Voice {
    Voice {
        id,
        name,
        gender,
        age,
        style,
        language,
        sample_url,
    }
}

static TTS_VOICES: [Voice; 9] = [
    voice("budi", "Budi", "Male", "Adult", "Professional", "id", SAMPLE_TEST),
    voice("wati", "Wati", "Female", "Adult", "Friendly", "id", SAMPLE_BACH),
    voice("joko", "Joko", "Male", "Young", "Casual", "id", SAMPLE_TEST),
    voice("siti", "Siti", "Female", "Mature", "Narrator", "id", SAMPLE_BACH),
    voice("agus", "Agus", "Male", "Adult", "Formal", "id", SAMPLE_TEST),
    voice("sarah", "Sarah", "Female", "Young", "Natural", "en", SAMPLE_BEETHOVEN),
    voice("john", "John", "Male", "Adult", "Professional", "en", SAMPLE_MOZART),
    voice("emma", "Emma", "Female", "Adult", "Cheerful", "en", SAMPLE_BEETHOVEN),
    voice("david", "David", "Male", "Mature", "Narrator", "en", SAMPLE_MOZART),
];

static COVER_VOICES: [Voice; 4] = [
    voice("pop-diva", "Pop Diva Style", "Female", "Adult", "Pop Singer", "", ""),
    voice("acoustic-storyteller", "Acoustic Storyteller Style", "Male", "Adult", "Singer-Songwriter", "", ""),
    voice("rnb-soul", "R&B Soul Style", "Female", "Adult", "R&B Singer", "", ""),
    voice("smooth-crooner", "Smooth Crooner Style", "Male", "Mature", "Soul Singer", "", ""),
];

static SPEECH_TO_SPEECH_VOICES: [Voice; 4] = [
    voice("professional-male", "Professional Male", "Male", "Adult", "Corporate", "", ""),
    voice("cheerful-female", "Cheerful Female", "Female", "Young", "Advertisement", "", ""),
    voice("old-storyteller", "Old Storyteller", "Male", "Mature", "Narration", "", ""),
    voice("energetic-youth", "Energetic Youth", "Male", "Young", "Podcast", "", ""),
];

static VOICEOVER_VOICES: [Voice; 3] = [
    voice("professional-male", "Professional Male", "Male", "Adult", "Corporate", "", ""),
    voice("warm-female", "Warm Female", "Female", "Adult", "Narration", "", ""),
    voice("character-voice", "Character Voice (Cloned)", "", "", "Cloned", "", ""),
];

/// The voice list offered by one generation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCatalog {
    Tts,
    Cover,
    SpeechToSpeech,
    Voiceover,
}

impl VoiceCatalog {
    /// Catalog a job kind picks its `voice` parameter from.
    pub fn for_kind(kind: JobKind) -> Option<Self> {
        match kind {
            JobKind::Tts => Some(VoiceCatalog::Tts),
            JobKind::VoiceCover => Some(VoiceCatalog::Cover),
            JobKind::SpeechToSpeech => Some(VoiceCatalog::SpeechToSpeech),
            JobKind::Voiceover => Some(VoiceCatalog::Voiceover),
            JobKind::Music | JobKind::VoiceCloneTraining => None,
        }
    }

    pub fn voices(&self) -> &'static [Voice] {
        match self {
            VoiceCatalog::Tts => &TTS_VOICES,
            VoiceCatalog::Cover => &COVER_VOICES,
            VoiceCatalog::SpeechToSpeech => &SPEECH_TO_SPEECH_VOICES,
            VoiceCatalog::Voiceover => &VOICEOVER_VOICES,
        }
    }

    pub fn find(&self, id: &str) -> Option<&'static Voice> {
        self.voices().iter().find(|v| v.id == id)
    }

    /// Display name for `id`, falling back to [`FALLBACK_VOICE_NAME`].
    pub fn display_name(&self, id: &str) -> &'static str {
        self.find(id).map(|v| v.name).unwrap_or(FALLBACK_VOICE_NAME)
    }

    /// Voices speaking `language`.
    pub fn for_language<'a>(&self, language: &'a str) -> impl Iterator<Item = &'static Voice> + 'a {
        self.voices().iter().filter(move |v| v.language == language)
    }
}
