use std::collections::HashMap;
use std::path::Path;

use failure::Error;
use ffmpeg_next::{self as ffmpeg, format, media::Type, util::log::Level, Rational};
use tracing::level_filters::LevelFilter;

use crate::boundary::TimeRange;
use crate::error::TrimError;
use crate::media::Media;

/// In-process stream copy through libavformat.
///
/// Cuts start at the keyframe at or before the range start, so clips may
/// begin slightly early; nothing is re-encoded.
pub struct Remux;

impl Remux {
    pub fn new(log_level: LevelFilter) -> Result<Self, Error> {
        ffmpeg::init()?;
        ffmpeg::util::log::set_level(ffmpeg_log_level(log_level));
        Ok(Remux)
    }
}

/// `AV_NOPTS_VALUE`
const NO_PTS: i64 = i64::MIN;

/// ffmpeg-next only opens UTF-8 paths.
fn utf8_path(path: &Path) -> Result<&str, TrimError> {
    path.to_str()
        .ok_or_else(|| TrimError::media(path, "path is not valid UTF-8"))
}

/// Seek target and end cutoff for `range`, in the stream's own timestamps.
///
/// Stream timestamps start at the stream's `start_time` (about 1.4s for
/// MPEG-TS), not at zero.
pub fn stream_window(range: TimeRange, time_base: Rational, start_time: i64) -> (i64, i64) {
    let offset = if start_time == NO_PTS { 0 } else { start_time };
    let tb = f64::from(time_base);
    let to_ts = |seconds: f64| (seconds / tb).round() as i64 + offset;
    (to_ts(range.start()), to_ts(range.end()))
}

/// FFmpeg is noisy at info, so everything up to info maps one step quieter.
pub fn ffmpeg_log_level(level: LevelFilter) -> Level {
    if level >= LevelFilter::TRACE {
        Level::Trace
    } else if level >= LevelFilter::DEBUG {
        Level::Debug
    } else if level >= LevelFilter::INFO {
        Level::Warning
    } else if level >= LevelFilter::ERROR {
        Level::Error
    } else {
        Level::Quiet
    }
}

impl Media for Remux {
    fn duration(&mut self, source: &Path) -> Result<f64, Error> {
        let ictx = format::input(&utf8_path(source)?).map_err(|e| TrimError::media(source, e))?;

        let duration = ictx.duration();
        if duration > 0 {
            return Ok(duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE));
        }

        // Some containers only carry a per-stream duration.
        let stream = ictx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| TrimError::media(source, ffmpeg::Error::StreamNotFound))?;
        if stream.duration() > 0 {
            return Ok(stream.duration() as f64 * f64::from(stream.time_base()));
        }
        Err(TrimError::media(source, "unknown duration").into())
    }

    fn extract(&mut self, source: &Path, range: TimeRange, output: &Path) -> Result<(), Error> {
        tracing::debug!("remuxing {} [{}] -> {}", source.display(), range, output.display());
        let input = utf8_path(source)?;
        let output = utf8_path(output)?;
        remux_with_seek(input, output, range).map_err(|e| TrimError::media(source, e).into())
    }
}

fn remux_with_seek(input: &str, output: &str, range: TimeRange) -> Result<(), ffmpeg::Error> {
    let mut ictx = format::input(&input)?;
    let mut octx = format::output(&output)?;

    let mut stream_map = HashMap::new();
    for istream in ictx.streams() {
        let medium = istream.parameters().medium();
        if medium != Type::Video && medium != Type::Audio && medium != Type::Subtitle {
            continue;
        }
        let mut ostream = octx.add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))?;
        ostream.set_parameters(istream.parameters());
        // Let the output muxer pick its own tag for the codec.
        unsafe {
            (*ostream.parameters().as_mut_ptr()).codec_tag = 0;
        }
        stream_map.insert(istream.index(), ostream.index());
    }

    let video_stream_index = ictx
        .streams()
        .best(Type::Video)
        .ok_or(ffmpeg::Error::StreamNotFound)?
        .index();
    let (seek_ts, end_ts) = {
        let video = ictx
            .stream(video_stream_index)
            .ok_or(ffmpeg::Error::StreamNotFound)?;
        stream_window(range, video.time_base(), video.start_time())
    };

    let ret = unsafe {
        ffmpeg::ffi::av_seek_frame(
            ictx.as_mut_ptr(),
            video_stream_index as i32,
            seek_ts,
            ffmpeg::ffi::AVSEEK_FLAG_BACKWARD,
        )
    };
    if ret < 0 {
        return Err(ffmpeg::Error::from(ret));
    }

    octx.write_header()?;

    // Time of the first packet after the seek becomes zero in the output.
    let mut origin: Option<f64> = None;
    for (istream, mut packet) in ictx.packets() {
        let out_index = match stream_map.get(&istream.index()) {
            Some(&index) => index,
            None => continue,
        };
        let in_time_base = istream.time_base();
        let ts = match packet.dts().or_else(|| packet.pts()) {
            Some(ts) => ts,
            None => continue,
        };

        if istream.index() == video_stream_index && packet.pts().unwrap_or(ts) >= end_ts {
            break;
        }

        let origin = *origin.get_or_insert(ts as f64 * f64::from(in_time_base));
        let shift = (origin / f64::from(in_time_base)).round() as i64;
        if ts < shift {
            continue;
        }
        packet.set_pts(packet.pts().map(|pts| pts - shift));
        packet.set_dts(packet.dts().map(|dts| dts - shift));

        let out_time_base = octx
            .stream(out_index)
            .ok_or(ffmpeg::Error::StreamNotFound)?
            .time_base();
        packet.rescale_ts(in_time_base, out_time_base);
        packet.set_position(-1);
        packet.set_stream(out_index);
        packet.write_interleaved(&mut octx)?;
    }

    octx.write_trailer()?;
    Ok(())
}
