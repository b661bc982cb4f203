use mm_core::Device;

const TITLE: &str = "MoMask: Text-to-Motion Generation";
const DESCRIPTION: &str = "Enter a natural language description (e.g., 'A person is walking forward.') \
and generate a 3D motion animation using MoMask.";
const PLACEHOLDER: &str = "A person is walking forward.";

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>%TITLE%</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #1f2328; }
  h1 { font-size: 1.6rem; margin-bottom: .25rem; }
  .muted { color: #59636e; }
  label { display: block; font-weight: 600; margin: 1rem 0 .4rem; }
  textarea { width: 100%; box-sizing: border-box; font: inherit; padding: .5rem; }
  button { font: inherit; padding: .5rem 1.2rem; margin-top: .6rem; cursor: pointer; }
  button:disabled { cursor: progress; opacity: .6; }
  video { width: 100%; background: #000; border-radius: 6px; }
  #error { display: none; background: #ffebe9; border: 1px solid #ff8182; padding: .6rem .8rem; border-radius: 6px; margin-top: 1rem; }
  #error button { float: right; margin: 0; padding: 0 .4rem; border: none; background: none; font-size: 1.1rem; }
</style>
</head>
<body>
<h1>%TITLE%</h1>
<p class="muted">%DESCRIPTION%</p>
<p class="muted">Device: %DEVICE%</p>

<form id="generate">
  <label for="prompt">Text prompt</label>
  <textarea id="prompt" name="prompt" rows="2" placeholder="%PLACEHOLDER%"></textarea>
  <button id="submit" type="submit">Submit</button>
</form>

<div id="error" role="alert"><button type="button" aria-label="Dismiss" id="dismiss">&times;</button><span id="error-text"></span></div>

<label for="video">Generated motion</label>
<video id="video" controls playsinline></video>

<script>
const form = document.getElementById("generate");
const button = document.getElementById("submit");
const errorBox = document.getElementById("error");
const errorText = document.getElementById("error-text");
const video = document.getElementById("video");

function showError(message) {
  errorText.textContent = message;
  errorBox.style.display = "block";
}

document.getElementById("dismiss").addEventListener("click", () => {
  errorBox.style.display = "none";
});

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  errorBox.style.display = "none";
  button.disabled = true;
  try {
    const resp = await fetch("/api/generate", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ prompt: document.getElementById("prompt").value }),
    });
    const body = await resp.json().catch(() => ({ error: `HTTP ${resp.status}` }));
    if (!resp.ok) {
      showError(body.error || `HTTP ${resp.status}`);
      return;
    }
    video.src = body.video_url;
    video.load();
  } catch (err) {
    showError(`Request failed: ${err}`);
  } finally {
    button.disabled = false;
  }
});
</script>
</body>
</html>
"#;

/// The single page: prompt box, submit button, video player and error banner
pub fn render_index(device: Device) -> String {
    INDEX_TEMPLATE
        .replace("%TITLE%", TITLE)
        .replace("%DESCRIPTION%", DESCRIPTION)
        .replace("%PLACEHOLDER%", PLACEHOLDER)
        .replace("%DEVICE%", &device.name())
}
