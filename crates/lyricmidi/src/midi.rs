//! Standard MIDI File output.
//!
//! Writes SMF format 0: one track holding the tempo and time-signature
//! meta events followed by a note-on/note-off pair per note.

use midly::num::{u15, u24, u28, u4, u7};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::emit::NoteEvent;
use crate::settings::Settings;
use crate::{Error, Result};

/// Ticks per quarter note.
pub const TICKS_PER_BEAT: u16 = 480;

/// MIDI clocks per metronome click in the time-signature event.
const CLOCKS_PER_CLICK: u8 = 24;

/// Notated 32nd notes per quarter in the time-signature event.
const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

/// Largest delta a track event can carry (28-bit variable length).
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Serialize a note track to SMF bytes.
pub fn to_midi(track: &[NoteEvent], settings: &Settings) -> Result<Vec<u8>> {
    let mut writer = MidiWriter::new(TICKS_PER_BEAT, 0);
    writer.tempo(settings.bpm);
    writer.time_signature(settings.time_sig_numerator, settings.time_sig_denominator);

    for event in track {
        let start = writer.beat_to_tick(event.start_beat)?;
        let duration = writer.beat_to_tick(event.duration_beat)?;
        writer.note(event.pitch, event.velocity, start, duration)?;
    }

    writer.finish()
}

/// Sort rank for events sharing a tick: meta first, then note-offs, then note-ons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Meta,
    NoteOff,
    NoteOn,
}

struct MidiEvent {
    tick: u32,
    rank: Rank,
    kind: TrackEventKind<'static>,
}

struct MidiWriter {
    ticks_per_beat: u16,
    channel: u4,
    events: Vec<MidiEvent>,
}

impl MidiWriter {
    fn new(ticks_per_beat: u16, channel: u8) -> Self {
        MidiWriter {
            ticks_per_beat,
            channel: u4::new(channel & 0x0F),
            events: Vec::new(),
        }
    }

    fn beat_to_tick(&self, beat: f64) -> Result<u32> {
        let tick = (beat * self.ticks_per_beat as f64).round();
        if !tick.is_finite() || tick > u32::MAX as f64 {
            return Err(Error::TickOverflow(format!("beat {} has no MIDI tick", beat)));
        }
        Ok(tick.max(0.0) as u32)
    }

    fn tempo(&mut self, bpm: f64) {
        let us_per_beat = (60_000_000.0 / bpm).round().clamp(1.0, 0xFF_FFFF as f64) as u32;
        self.meta(MetaMessage::Tempo(u24::new(us_per_beat)));
    }

    fn time_signature(&mut self, numerator: u8, denominator: u8) {
        // Denominator is stored as a power of two
        let denominator_pow = denominator.max(1).trailing_zeros() as u8;
        self.meta(MetaMessage::TimeSignature(
            numerator,
            denominator_pow,
            CLOCKS_PER_CLICK,
            THIRTY_SECONDS_PER_QUARTER,
        ));
    }

    fn note(
        &mut self,
        pitch: u8,
        velocity: u8,
        start_tick: u32,
        duration_ticks: u32,
    ) -> Result<()> {
        let end_tick = start_tick.checked_add(duration_ticks).ok_or_else(|| {
            Error::TickOverflow(format!(
                "note at tick {} lasting {} ticks",
                start_tick, duration_ticks
            ))
        })?;
        let key = u7::new(pitch & 0x7F);
        self.events.push(MidiEvent {
            tick: start_tick,
            rank: Rank::NoteOn,
            kind: TrackEventKind::Midi {
                channel: self.channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(velocity & 0x7F),
                },
            },
        });
        self.events.push(MidiEvent {
            tick: end_tick,
            rank: Rank::NoteOff,
            kind: TrackEventKind::Midi {
                channel: self.channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
        Ok(())
    }

    fn meta(&mut self, message: MetaMessage<'static>) {
        self.events.push(MidiEvent {
            tick: 0,
            rank: Rank::Meta,
            kind: TrackEventKind::Meta(message),
        });
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.events.sort_by_key(|e| (e.tick, e.rank));

        let mut track: Track<'static> = Vec::with_capacity(self.events.len() + 1);
        let mut last_tick = 0u32;
        for event in self.events {
            let delta = event.tick - last_tick;
            if delta > MAX_DELTA {
                return Err(Error::TickOverflow(format!(
                    "gap of {} ticks before tick {}",
                    delta, event.tick
                )));
            }
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: event.kind,
            });
            last_tick = event.tick;
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_beat)),
        ));
        smf.tracks.push(track);

        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;
        Ok(buf)
    }
}
