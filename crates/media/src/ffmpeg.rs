//! ffmpeg-backed frame source and sink.
//!
//! Both ends talk to a system `ffmpeg` process over pipes using packed
//! `rgb24` raw video. Stream properties come from `ffprobe`.

use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_frame_model::{frame_byte_len, Frame};

use crate::sink::{check_push, FrameSink, SinkConfig};
use crate::source::{FrameSource, VideoInfo};

/// Whether `binary` resolves on `PATH`.
///
/// The name reaches the shell as a positional argument, never as script text.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .args(["-c", "command -v \"$1\" >/dev/null 2>&1", "sh", binary])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Start the child in its own process group.
///
/// A terminal Ctrl-C signals the whole foreground group; the ffmpeg
/// children must not see it, only the stop flag does.
fn own_process_group(cmd: &mut Command) -> &mut Command {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    cmd
}

/// Whether both `ffmpeg` and `ffprobe` are installed.
pub fn ffmpeg_available() -> bool {
    command_exists("ffmpeg") && command_exists("ffprobe")
}

/// Probe the first video stream of `path`.
pub fn probe_video(path: &Path) -> PixsortResult<VideoInfo> {
    if !path.exists() {
        return Err(PixsortError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames:format=duration",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| PixsortError::decode(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(PixsortError::decode(format!(
            "ffprobe failed on {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&raw)
}

/// Parse `key=value` lines printed by `ffprobe -of default=noprint_wrappers=1`.
pub fn parse_probe_output(raw: &str) -> PixsortResult<VideoInfo> {
    let mut width = None;
    let mut height = None;
    let mut r_rate = None;
    let mut avg_rate = None;
    let mut nb_frames = None;
    let mut duration = None;

    for line in raw.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "width" => width = value.parse::<usize>().ok(),
            "height" => height = value.parse::<usize>().ok(),
            "r_frame_rate" => r_rate = parse_rate(value),
            "avg_frame_rate" => avg_rate = parse_rate(value),
            "nb_frames" => nb_frames = value.parse::<u64>().ok(),
            "duration" => duration = value.parse::<f64>().ok(),
            _ => {}
        }
    }

    let (width, height) = match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(PixsortError::decode(
                "ffprobe reported no video stream dimensions",
            ))
        }
    };

    let fps = avg_rate.or(r_rate).unwrap_or(0.0);
    let frame_count = match (nb_frames, duration) {
        (Some(n), _) if n > 0 => n,
        (_, Some(secs)) if secs > 0.0 && fps > 0.0 => (secs * fps).round() as u64,
        _ => 0,
    };

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Parse an ffprobe rational such as `30000/1001`. `0/0` means unknown.
fn parse_rate(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Drain a child's stderr on a thread so a full pipe never stalls it.
fn drain_stderr(child: &mut Child) -> PixsortResult<JoinHandle<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| PixsortError::decode("Failed to capture ffmpeg stderr"))?;
    Ok(std::thread::spawn(move || {
        let mut reader = BufReader::new(stderr);
        let mut output = String::new();
        match reader.read_to_string(&mut output) {
            Ok(_) => output,
            Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
        }
    }))
}

fn join_stderr(task: Option<JoinHandle<String>>) -> String {
    task.map(|t| {
        t.join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string())
    })
    .unwrap_or_default()
}

/// Read until `buf` is full or the stream ends. Returns bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Decodes a video file into `rgb24` frames through `ffmpeg`.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
    scratch: Vec<u8>,
    finished: bool,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: impl Into<PathBuf>) -> PixsortResult<Self> {
        let path = path.into();
        let info = probe_video(&path)?;
        let frame_bytes = frame_byte_len(info.width, info.height)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-v", "error", "-nostdin", "-i"])
            .arg(&path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        own_process_group(&mut cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| PixsortError::decode(format!("Failed to start ffmpeg: {e}")))?;
        tracing::info!(
            pid = child.id(),
            input = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            frames = info.frame_count,
            "ffmpeg decoder started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PixsortError::decode("Failed to capture ffmpeg stdout"))?;
        let stderr_task = drain_stderr(&mut child)?;

        Ok(Self {
            path,
            info,
            child: Some(child),
            stdout: Some(BufReader::new(stdout)),
            stderr_task: Some(stderr_task),
            scratch: vec![0u8; frame_bytes],
            finished: false,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn read_frame(&mut self, frame: &mut Frame) -> PixsortResult<bool> {
        if self.finished {
            return Ok(false);
        }
        let stdout = self
            .stdout
            .as_mut()
            .ok_or_else(|| PixsortError::decode("ffmpeg source already closed"))?;

        let read = read_full(stdout, &mut self.scratch)
            .map_err(|e| PixsortError::decode(format!("Failed reading ffmpeg output: {e}")))?;
        if read == 0 {
            self.finished = true;
            return Ok(false);
        }
        if read < self.scratch.len() {
            self.finished = true;
            return Err(PixsortError::decode(format!(
                "ffmpeg output ended mid-frame ({read} of {} bytes) for {}",
                self.scratch.len(),
                self.path.display()
            )));
        }
        frame.fill_from_rgb_bytes(&self.scratch)?;
        Ok(true)
    }

    fn close(&mut self) -> PixsortResult<()> {
        self.stdout.take();
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if !self.finished {
            // Stopped early: the decoder would block on a pipe nobody reads.
            child.kill().ok();
            child.wait().ok();
            join_stderr(self.stderr_task.take());
            return Ok(());
        }

        let status = child
            .wait()
            .map_err(|e| PixsortError::decode(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = join_stderr(self.stderr_task.take());
        if !status.success() {
            return Err(PixsortError::decode(format!(
                "ffmpeg decode failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            child.kill().ok();
            child.wait().ok();
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Debug, Clone)]
pub struct FfmpegSinkOpts {
    /// Output file path; the container follows its extension.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// ffmpeg video codec (`-c:v`).
    pub codec: String,
    /// ffmpeg output pixel format (`-pix_fmt`).
    pub pix_fmt: String,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            codec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
        }
    }
}

/// Encodes `rgb24` frames into a video file through `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<BufWriter<ChildStdin>>,
    stderr_task: Option<JoinHandle<String>>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_index: Option<u64>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_task: None,
            scratch: Vec::new(),
            cfg: None,
            last_index: None,
        }
    }

    /// Arguments for one encode run, output path last.
    fn build_args(&self, cfg: &SinkConfig) -> Vec<String> {
        let mut args = vec![
            if self.opts.overwrite { "-y" } else { "-n" }.to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgb24".to_string(),
            "-s".to_string(),
            format!("{}x{}", cfg.width, cfg.height),
            "-r".to_string(),
            format!("{}", cfg.fps),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-an".to_string(),
        ];
        // Chroma-subsampled formats need even dimensions.
        let subsampled = self.opts.pix_fmt.starts_with("yuv420") || self.opts.pix_fmt == "nv12";
        if subsampled && (cfg.width % 2 == 1 || cfg.height % 2 == 1) {
            args.push("-vf".to_string());
            args.push("pad=ceil(iw/2)*2:ceil(ih/2)*2".to_string());
        }
        args.extend([
            "-c:v".to_string(),
            self.opts.codec.clone(),
            "-pix_fmt".to_string(),
            self.opts.pix_fmt.clone(),
        ]);
        args.push(self.opts.out_path.display().to_string());
        args
    }

    /// Stop ffmpeg and return its stderr, for error messages.
    fn abort(&mut self) -> String {
        self.stdin.take();
        if let Some(mut child) = self.child.take() {
            child.kill().ok();
            child.wait().ok();
        }
        join_stderr(self.stderr_task.take())
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> PixsortResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PixsortError::encode(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !(cfg.fps.is_finite() && cfg.fps > 0.0) {
            return Err(PixsortError::encode(format!(
                "ffmpeg sink fps must be positive, got {}",
                cfg.fps
            )));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(PixsortError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if let Some(parent) = self.opts.out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let args = self.build_args(&cfg);
        tracing::debug!(?args, "Running ffmpeg encoder");
        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        own_process_group(&mut cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| {
                PixsortError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PixsortError::encode("Failed to open ffmpeg stdin"))?;
        let stderr_task = drain_stderr(&mut child)?;
        tracing::info!(
            pid = child.id(),
            output = %self.opts.out_path.display(),
            codec = %self.opts.codec,
            "ffmpeg encoder started"
        );

        self.scratch = Vec::with_capacity(frame_byte_len(cfg.width, cfg.height)?);
        self.child = Some(child);
        self.stdin = Some(BufWriter::new(stdin));
        self.stderr_task = Some(stderr_task);
        self.cfg = Some(cfg);
        self.last_index = None;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &Frame) -> PixsortResult<()> {
        check_push(self.cfg.as_ref(), self.last_index, index, frame)?;

        self.scratch.clear();
        frame.write_rgb_bytes(&mut self.scratch);
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| PixsortError::encode("ffmpeg sink not started"))?;
        if let Err(e) = stdin.write_all(&self.scratch) {
            let stderr_output = self.abort();
            return Err(PixsortError::encode(format!(
                "Failed writing frame {index} to ffmpeg: {e}: {}",
                stderr_output.trim()
            )));
        }
        self.last_index = Some(index);
        Ok(())
    }

    fn end(&mut self) -> PixsortResult<()> {
        if let Some(mut stdin) = self.stdin.take() {
            if let Err(e) = stdin.flush() {
                let stderr_output = self.abort();
                return Err(PixsortError::encode(format!(
                    "Failed flushing ffmpeg input: {e}: {}",
                    stderr_output.trim()
                )));
            }
        }
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child
            .wait()
            .map_err(|e| PixsortError::encode(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = join_stderr(self.stderr_task.take());
        if !status.success() {
            return Err(PixsortError::encode(format!(
                "ffmpeg encode failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }
        tracing::info!(output = %self.opts.out_path.display(), "ffmpeg encoder finished");
        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}
