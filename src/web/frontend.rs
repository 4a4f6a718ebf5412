//! Embedded HTML/CSS/JS frontend for the repopulse web dashboard.
//!
//! The whole page is compiled into the binary. Charts are drawn as inline
//! SVG from the datasets returned by `/api/dashboard`; no CDN, no build step.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Repository Analytics</title>
<style>
:root {
  --bg: #faf5ff;
  --surface: #ffffff;
  --border: #ede9fe;
  --text: #1f2937;
  --text-muted: #6b7280;
  --accent: #a855f7;
  --green: #15803d;
  --green-bg: #dcfce7;
  --red: #b91c1c;
  --red-bg: #fee2e2;
  --radius: 12px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: linear-gradient(135deg, #faf5ff, #fdf2f8); color: var(--text); font-family: var(--font); font-size: 14px; min-height: 100vh; }
.app { max-width: 1400px; margin: 0 auto; padding: 32px 16px; }

header { margin-bottom: 32px; }
header h1 { font-size: 28px; font-weight: 700; border-left: 4px solid var(--accent); padding-left: 14px; }
header .repo { color: var(--text-muted); padding-left: 18px; margin-top: 4px; }
header .repo span { color: var(--accent); font-weight: 500; }
.toolbar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 16px; margin-top: 16px; }
.source { font-size: 12px; padding: 2px 10px; border-radius: 999px; background: var(--border); color: var(--text-muted); }
.source.synthetic { background: #fef3c7; color: #92400e; }

.ranges { display: flex; gap: 12px; }
.ranges button { border: 1px solid transparent; border-radius: var(--radius); padding: 10px 28px; font-size: 15px; font-weight: 600; background: var(--surface); color: var(--text); cursor: pointer; }
.ranges button.active { background: var(--accent); color: #fff; box-shadow: 0 6px 16px rgba(168,85,247,0.3); }
.ranges button:disabled { opacity: 0.5; cursor: not-allowed; }

.card, .panel { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); box-shadow: 0 10px 24px rgba(168,85,247,0.08); }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 24px; margin-bottom: 32px; }
.card { padding: 24px; }
.card .title { font-size: 13px; color: var(--text-muted); margin-bottom: 4px; }
.card .value { font-size: 30px; font-weight: 600; display: inline-block; margin-right: 8px; }
.trend { font-size: 12px; padding: 2px 8px; border-radius: 999px; background: #f3f4f6; color: var(--text-muted); }
.trend.up { background: var(--green-bg); color: var(--green); }
.trend.down { background: var(--red-bg); color: var(--red); }

.charts { display: grid; grid-template-columns: repeat(auto-fill, minmax(560px, 1fr)); gap: 32px; }
.panel { padding: 24px; }
.panel h3 { font-size: 17px; font-weight: 600; margin-bottom: 16px; }
.panel svg { width: 100%; height: 256px; }
.legend { display: flex; gap: 16px; flex-wrap: wrap; margin-top: 8px; font-size: 12px; color: var(--text-muted); }
.legend i { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }

.skeleton { background: #e5e7eb; border-radius: 6px; animation: pulse 1.5s infinite; }
@keyframes pulse { 50% { opacity: 0.5; } }

.error { max-width: 420px; margin: 120px auto; padding: 32px; text-align: center; }
.error h2 { margin-bottom: 8px; }
.error p { color: var(--text-muted); margin-bottom: 16px; }
.error button { width: 100%; padding: 10px; border: 0; border-radius: 8px; background: var(--accent); color: #fff; cursor: pointer; }

footer { margin-top: 48px; padding: 20px; text-align: center; color: var(--text-muted); }
</style>
</head>
<body>
<div class="app" id="app">
  <header>
    <h1>Repository Analytics</h1>
    <p class="repo">Repository: <span id="repo">…</span></p>
    <div class="toolbar">
      <span class="source" id="source"></span>
      <div class="ranges" id="ranges"></div>
    </div>
  </header>
  <section class="cards" id="cards"></section>
  <section class="charts" id="charts"></section>
  <footer class="panel">Last updated: <span id="updated">—</span></footer>
</div>

<script>
const COLORS = ['#A855F7', '#EC4899', '#F59E0B', '#10B981', '#3B82F6', '#8B5CF6', '#F97316'];
const SERIES_COLORS = { 'Open Issues': '#EF4444', 'Watchers': '#3B82F6' };

let selected = 30;
let loading = false;
let requestSeq = 0;

function el(tag, attrs = {}, children = []) {
  const node = document.createElement(tag);
  for (const [k, v] of Object.entries(attrs)) {
    if (k === 'class') node.className = v; else if (k === 'text') node.textContent = v; else node.setAttribute(k, v);
  }
  for (const c of children) node.appendChild(c);
  return node;
}

function svgEl(tag, attrs = {}) {
  const node = document.createElementNS('http://www.w3.org/2000/svg', tag);
  for (const [k, v] of Object.entries(attrs)) node.setAttribute(k, v);
  return node;
}

// ---------------------------------------------------------------------------
// Window selector
// ---------------------------------------------------------------------------

async function renderRanges() {
  const ranges = await (await fetch('/api/ranges')).json();
  const box = document.getElementById('ranges');
  box.replaceChildren(...ranges.map(r => {
    const b = el('button', { text: r.label, 'data-days': r.days });
    b.onclick = () => { if (selected !== r.days) { selected = r.days; load(); } };
    return b;
  }));
  syncRanges();
}

function syncRanges() {
  for (const b of document.querySelectorAll('#ranges button')) {
    b.classList.toggle('active', Number(b.dataset.days) === selected);
    b.disabled = loading;
  }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

async function load() {
  // Only the newest request may update the page.
  const seq = ++requestSeq;
  loading = true;
  syncRanges();
  renderPlaceholders();
  try {
    const res = await fetch(`/api/dashboard?days=${selected}`, { cache: 'no-store' });
    const body = await res.json();
    if (!res.ok) throw new Error(body.error || `HTTP ${res.status}`);
    if (seq !== requestSeq) return;
    render(body);
  } catch (err) {
    if (seq !== requestSeq) return;
    renderError(err.message || 'Unknown error');
  } finally {
    if (seq === requestSeq) { loading = false; syncRanges(); }
  }
}

function renderPlaceholders() {
  document.getElementById('cards').replaceChildren(...Array.from({ length: 6 }, () =>
    el('div', { class: 'card' }, [el('div', { class: 'skeleton', style: 'height:16px;width:96px;margin-bottom:8px' }), el('div', { class: 'skeleton', style: 'height:40px;width:80px' })])));
  document.getElementById('charts').replaceChildren(...Array.from({ length: 6 }, () =>
    el('div', { class: 'panel' }, [el('div', { class: 'skeleton', style: 'height:24px;width:128px;margin-bottom:16px' }), el('div', { class: 'skeleton', style: 'height:256px' })])));
}

function renderError(message) {
  const retry = el('button', { text: 'Try Again' });
  retry.onclick = () => location.reload();
  document.getElementById('app').replaceChildren(
    el('div', { class: 'panel error' }, [el('h2', { text: 'Error Loading Data' }), el('p', { text: message }), retry]));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

function render(view) {
  document.getElementById('repo').textContent = view.repo;
  const source = document.getElementById('source');
  source.textContent = view.source.kind === 'remote' ? 'live metrics' : `synthetic data: ${view.source.reason}`;
  source.classList.toggle('synthetic', view.source.kind !== 'remote');

  document.getElementById('cards').replaceChildren(...view.cards.map(card => {
    const cls = card.trend > 0 ? 'trend up' : card.trend < 0 ? 'trend down' : 'trend';
    const sign = card.trend > 0 ? '+' : '';
    return el('div', { class: 'card' }, [
      el('p', { class: 'title', text: card.title }),
      el('span', { class: 'value', text: card.display }),
      el('span', { class: cls, text: `${sign}${card.trend}%` }),
    ]);
  }));

  document.getElementById('charts').replaceChildren(...view.charts.map(chart => {
    const panel = el('div', { class: 'panel' }, [el('h3', { text: chart.title })]);
    panel.appendChild(chart.kind === 'pie' ? pieChart(chart) : xyChart(chart));
    panel.appendChild(legend(chart));
    return panel;
  }));

  document.getElementById('updated').textContent = new Date().toLocaleString();
}

function legend(chart) {
  const names = chart.kind === 'pie' ? chart.labels : chart.datasets.map(d => d.label);
  return el('div', { class: 'legend' }, names.map((name, i) => {
    const swatch = el('i');
    swatch.style.background = SERIES_COLORS[name] || COLORS[i % COLORS.length];
    return el('span', {}, [swatch, document.createTextNode(name)]);
  }));
}

function xyChart(chart) {
  const W = 560, H = 256, PAD = 32;
  const svg = svgEl('svg', { viewBox: `0 0 ${W} ${H}`, preserveAspectRatio: 'none' });
  const all = chart.datasets.flatMap(d => d.values);
  if (all.length === 0) return svg;
  const min = chart.kind === 'bar' ? 0 : Math.min(...all);
  const max = Math.max(...all);
  const span = max - min || 1;
  const n = chart.labels.length;
  const x = i => PAD + (n <= 1 ? 0 : i * (W - 2 * PAD) / (n - 1));
  const y = v => H - PAD - (v - min) * (H - 2 * PAD) / span;

  svg.appendChild(svgEl('line', { x1: PAD, y1: H - PAD, x2: W - PAD, y2: H - PAD, stroke: '#e5e7eb' }));
  const step = Math.max(1, Math.ceil(n / 8));
  chart.labels.forEach((label, i) => {
    if (i % step !== 0) return;
    const t = svgEl('text', { x: x(i), y: H - 8, 'font-size': 10, fill: '#6b7280', 'text-anchor': 'middle' });
    t.textContent = label;
    svg.appendChild(t);
  });

  chart.datasets.forEach((ds, di) => {
    const color = SERIES_COLORS[ds.label] || COLORS[di % COLORS.length];
    if (chart.kind === 'bar') {
      const bw = Math.max(2, (W - 2 * PAD) / n * 0.7);
      ds.values.forEach((v, i) => svg.appendChild(svgEl('rect', {
        x: x(i) - bw / 2, y: y(v), width: bw, height: H - PAD - y(v), fill: color, rx: 3,
      })));
      return;
    }
    const points = ds.values.map((v, i) => `${x(i)},${y(v)}`).join(' ');
    if (chart.kind === 'area') {
      svg.appendChild(svgEl('polygon', {
        points: `${x(0)},${H - PAD} ${points} ${x(n - 1)},${H - PAD}`, fill: color, 'fill-opacity': 0.15,
      }));
    }
    svg.appendChild(svgEl('polyline', { points, fill: 'none', stroke: color, 'stroke-width': 2 }));
  });
  return svg;
}

function pieChart(chart) {
  const R = 100, C = 128;
  const svg = svgEl('svg', { viewBox: `0 0 ${2 * C} ${2 * C}` });
  const values = chart.datasets[0] ? chart.datasets[0].values : [];
  const total = values.reduce((a, b) => a + b, 0);
  if (total === 0) return svg;
  let angle = -Math.PI / 2;
  values.forEach((v, i) => {
    const color = COLORS[i % COLORS.length];
    if (v === total) {
      svg.appendChild(svgEl('circle', { cx: C, cy: C, r: R, fill: color }));
      return;
    }
    const next = angle + 2 * Math.PI * v / total;
    const large = next - angle > Math.PI ? 1 : 0;
    const d = `M ${C} ${C} L ${C + R * Math.cos(angle)} ${C + R * Math.sin(angle)} ` +
      `A ${R} ${R} 0 ${large} 1 ${C + R * Math.cos(next)} ${C + R * Math.sin(next)} Z`;
    svg.appendChild(svgEl('path', { d, fill: color, stroke: '#fff', 'stroke-width': 2 }));
    angle = next;
  });
  return svg;
}

renderRanges().then(load).catch(err => renderError(err.message || 'Unknown error'));
</script>
</body>
</html>
"##;
