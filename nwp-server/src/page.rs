//! HTML rendering for the form page.

const STYLE: &str = r#"
body {
	margin: 0;
	min-height: 100vh;
	background: linear-gradient(135deg, #0f2027, #203a43, #2c5364);
	background-attachment: fixed;
	color: white;
	font-family: 'Poppins', sans-serif;
}
main { max-width: 720px; margin: 0 auto; padding: 40px 20px; }
h1 { text-align: center; color: #ff9900; text-shadow: 2px 2px 6px #000; }
.subtitle { text-align: center; font-size: 18px; }
label { display: block; margin-top: 24px; font-weight: bold; }
input[type=text] { width: 100%; padding: 10px; border-radius: 8px; border: none; font-size: 16px; }
input[type=range] { width: 100%; }
button {
	width: 100%; margin-top: 24px; padding: 12px; border: none; border-radius: 8px;
	background: #ff9900; color: #000; font-size: 18px; cursor: pointer;
}
.card {
	margin-top: 32px; padding: 30px; border-radius: 18px; text-align: center;
	background: rgba(255,255,255,0.12); box-shadow: 0 0 30px rgba(255,153,0,0.4);
}
.card h3 { color: #ff9900; }
.card p { font-size: 20px; line-height: 1.6; }
.error { color: #ff6b6b; }
footer { text-align: center; opacity: 0.85; margin-top: 40px; }
"#;

/// What to show below the form.
pub enum Outcome<'a> {
	Nothing,
	Generated(&'a str),
	Failed(&'a str),
}

/// Escapes text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Renders the whole page.
pub fn render(prompt: &str, count: i64, max_words: usize, outcome: Outcome) -> String {
	let result = match outcome {
		Outcome::Nothing => String::new(),
		Outcome::Generated(text) => format!(
			r#"<div class="card"><h3>Generated Text</h3><p>{}</p></div>"#,
			escape_html(text)
		),
		Outcome::Failed(message) => format!(
			r#"<div class="card"><h3>Generation failed</h3><p class="error">{}</p></div>"#,
			escape_html(message)
		),
	};

	format!(
		r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI Text Generator</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>AI Text Generator</h1>
<p class="subtitle">Generate movie-style text word by word</p>
<form action="/generate" method="get">
<label for="prompt">Starting Text</label>
<input type="text" id="prompt" name="prompt" value="{prompt}">
<label for="count">Words to Generate: <output id="count-value">{count}</output></label>
<input type="range" id="count" name="count" min="1" max="{max_words}" value="{count}"
	oninput="document.getElementById('count-value').value = this.value">
<button type="submit">Generate Text</button>
</form>
{result}
<footer>Next-word generator</footer>
</main>
</body>
</html>"#,
		prompt = escape_html(prompt),
	)
}
