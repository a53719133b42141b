use crate::models::{ControlView, CounterView, FormSnapshot, UndoView};

pub fn render_scout_page(snapshot: &FormSnapshot) -> String {
    let rows: String = snapshot.counters.iter().map(render_counter).collect();
    let undo = |index: usize| {
        snapshot
            .undo_controls
            .get(index)
            .map(render_undo)
            .unwrap_or_default()
    };
    let last_undo = snapshot.undo_controls.len().saturating_sub(1);

    INDEX_HTML
        .replace("{{FORM_ID}}", &escape(&snapshot.form_id))
        .replace("{{UNDO_TOP}}", &undo(0))
        .replace("{{UNDO_BOTTOM}}", &if last_undo > 0 { undo(last_undo) } else { String::new() })
        .replace("{{ROWS}}", &rows)
        .replace("{{CYCLES}}", &snapshot.cycles.to_string())
        .replace("{{SUCCESSFUL}}", &snapshot.successful_cycles.to_string())
        .replace("{{MISSED}}", &snapshot.total_missed.to_string())
        .replace("{{HISTORY}}", &snapshot.history_len.to_string())
}

fn render_counter(counter: &CounterView) -> String {
    let name = counter.name.as_deref().unwrap_or_default();
    format!(
        r#"      <div class="counter">
        <span class="counter-caption">{caption}</span>
        {miss}
        <input type="number" name="{name}" value="{value}" readonly />
        {success}
      </div>
"#,
        caption = escape(&counter.caption),
        miss = render_control(counter.miss.as_ref(), "counter-minus"),
        name = escape(name),
        value = counter.value,
        success = render_control(counter.success.as_ref(), "counter-plus"),
    )
}

fn render_control(control: Option<&ControlView>, class: &str) -> String {
    let Some(control) = control else {
        return String::new();
    };
    let title = control
        .title
        .as_deref()
        .map(|title| format!(r#" title="{}""#, escape(title)))
        .unwrap_or_default();
    let disabled = if control.disabled { " disabled" } else { "" };
    format!(
        r#"<form class="click-form" method="post" action="/scout/click/{id}"><button class="counter-btn {class}" type="submit" data-control="{id}"{title}{disabled}>{label}</button></form>"#,
        id = control.id.0,
        label = escape(&control.label),
    )
}

fn render_undo(undo: &UndoView) -> String {
    let element_id = undo
        .element_id
        .as_deref()
        .map(|id| format!(r#" id="{}""#, escape(id)))
        .unwrap_or_default();
    format!(
        r#"<form class="click-form" method="post" action="/scout/click/{id}"><button class="btn-undo"{element_id} type="submit" data-control="{id}">{label}</button></form>"#,
        id = undo.id.0,
        label = escape(&undo.label),
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Scouting Form</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .totals {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 14px 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .counter {
      display: grid;
      grid-template-columns: 1fr auto 90px auto;
      align-items: center;
      gap: 12px;
      padding: 8px 0;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .counter input {
      width: 100%;
      text-align: center;
      font: inherit;
      font-size: 1.2rem;
      border: none;
      background: transparent;
    }

    form {
      margin: 0;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      color: white;
    }

    button:disabled {
      opacity: 0.35;
      cursor: default;
    }

    .counter-minus {
      background: var(--accent-2);
    }

    .counter-plus {
      background: var(--accent);
    }

    .btn-undo {
      background: #6b645d;
      width: 100%;
    }

    .report {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 12px;
    }

    .report label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    .report input,
    .report select,
    .report textarea {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Scouting Form</h1>

    <section class="totals">
      <div class="stat"><span class="label">Cycles</span><span id="cycles" class="value">{{CYCLES}}</span></div>
      <div class="stat"><span class="label">Successful</span><span id="successful" class="value">{{SUCCESSFUL}}</span></div>
      <div class="stat"><span class="label">Missed</span><span id="missed" class="value">{{MISSED}}</span></div>
      <div class="stat"><span class="label">Actions</span><span id="history" class="value">{{HISTORY}}</span></div>
    </section>

    <section id="{{FORM_ID}}">
      {{UNDO_TOP}}
{{ROWS}}      {{UNDO_BOTTOM}}
    </section>

    <form class="report" method="post" action="/scout/submit">
      <label>Team number <input name="team_number" /></label>
      <label>Team name <input name="team_name" /></label>
      <label>Event <input name="event" /></label>
      <label>Scout <input name="scout_name" /></label>
      <label>Match <input name="match_number" /></label>
      <label>Auto move
        <select name="auto_move"><option value="no">No</option><option value="yes">Yes</option></select>
      </label>
      <label>Processor
        <select name="teleop_processor"><option value="no">No</option><option value="yes">Yes</option></select>
      </label>
      <label><span><input type="checkbox" name="endgame_park" value="yes" /> Park</span></label>
      <label><span><input type="checkbox" name="endgame_shallow_climb" value="yes" /> Shallow climb</span></label>
      <label><span><input type="checkbox" name="endgame_deep_climb" value="yes" /> Deep climb</span></label>
      <label>Auto notes <textarea name="auto_notes"></textarea></label>
      <label>Teleop notes <textarea name="teleop_notes"></textarea></label>
      <label>Endgame notes <textarea name="endgame_notes"></textarea></label>
      <label>Additional notes <textarea name="additional_notes"></textarea></label>
      <button class="counter-plus" type="submit">Submit report</button>
    </form>

    <div id="status" class="status" role="status" aria-live="polite"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const updateUI = (form) => {
      form.counters.forEach((counter) => {
        if (!counter.name) {
          return;
        }
        const input = document.querySelector(`input[name="${counter.name}"]`);
        if (input) {
          input.value = counter.value;
        }
      });
      document.getElementById('cycles').textContent = form.cycles;
      document.getElementById('successful').textContent = form.successful_cycles;
      document.getElementById('missed').textContent = form.total_missed;
      document.getElementById('history').textContent = form.history_len;
    };

    const send = async (control) => {
      const res = await fetch('/api/click', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ control })
      });

      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }

      const body = await res.json();
      updateUI(body.form);
      setStatus('', '');
    };

    document.querySelectorAll('.click-form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        const button = form.querySelector('button');
        send(Number(button.dataset.control)).catch((err) => setStatus(err.message, 'error'));
      });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ScoutPage;

    #[test]
    fn page_renders_counters_and_both_undo_controls() {
        let page = ScoutPage::load();
        let html = render_scout_page(&page.snapshot().unwrap());

        assert!(html.contains(r#"name="teleop_l4_branch_successful""#));
        assert!(html.contains(r#"title="Missed Attempt""#));
        assert!(html.contains(">S</button>"));
        assert_eq!(html.matches(r#"id="undoButton""#).count(), 2);
        assert!(html.contains(" disabled>-</button>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn undo_controls_render_their_element_id() {
        let undo = UndoView {
            id: crate::form::ControlId(3),
            element_id: Some("undoButton".into()),
            label: "Undo".into(),
        };
        let html = render_undo(&undo);
        assert!(html.contains(r#"action="/scout/click/3""#));
        assert!(html.contains(r#"id="undoButton""#));

        let plain = render_undo(&UndoView {
            element_id: None,
            ..undo
        });
        assert!(!plain.contains(" id="));
    }
}
