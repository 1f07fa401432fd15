// Testes de ponta a ponta: sobem o binário com uma base SQLite
// descartável e exercitam os fluxos via HTTP, como um navegador faria.
use once_cell::sync::Lazy;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_db_url() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("judo_http_{}_{}.db", std::process::id(), nanos));
    format!("sqlite:{}", path.to_string_lossy())
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/login")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_judo-gestao"))
        .env("PORTA", port.to_string())
        .env("DATABASE_URL", unique_db_url())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

/// Cliente com cookies e sem seguir redirects, para inspecionar os
/// Location dos fluxos Post/Redirect/Get.
fn novo_cliente() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

async fn cliente_logado(base_url: &str, username: &str, password: &str) -> Client {
    let client = novo_cliente();
    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .unwrap();
    assert!(
        resp.status().is_redirection(),
        "login de {username} falhou: {}",
        resp.status()
    );
    client
}

fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Extrai o primeiro id numérico que aparece logo depois do marcador
/// (ex.: "alunos/editar/") a partir da posição do texto âncora.
fn id_depois_de(html: &str, ancora: &str, marcador: &str) -> i64 {
    let inicio = html.find(ancora).unwrap_or_else(|| {
        panic!("âncora {ancora:?} não encontrada na página");
    });
    let resto = &html[inicio..];
    let pos = resto
        .find(marcador)
        .unwrap_or_else(|| panic!("marcador {marcador:?} não encontrado após {ancora:?}"));
    let depois = &resto[pos + marcador.len()..];
    let digitos: String = depois.chars().take_while(|c| c.is_ascii_digit()).collect();
    digitos.parse().expect("id numérico após o marcador")
}

async fn criar_aluno(client: &Client, base_url: &str, nome: &str) -> i64 {
    let resp = client
        .post(format!("{base_url}/painel/alunos/novo"))
        .form(&[
            ("nome_completo", nome),
            ("tipo", "Adulto"),
            ("data_nascimento", "1998-04-10"),
            ("data_matricula", "2026-01-10"),
            ("status", "Ativo"),
            ("graduacao_atual", "Branca"),
            ("peso", "70"),
            ("altura", "175"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection(), "criação de aluno falhou");

    let lista = client
        .get(format!("{base_url}/painel/alunos"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    id_depois_de(&lista, nome, "alunos/editar/")
}

#[tokio::test]
async fn http_login_admin_redireciona_para_painel() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = novo_cliente();

    let resp = client
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "admin"), ("password", "admin123")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/painel/dashboard");

    let painel = client
        .get(format!("{}/painel/dashboard", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(painel.status(), StatusCode::OK);
    let html = painel.text().await.unwrap();
    assert!(html.contains("Dashboard"));
}

#[tokio::test]
async fn http_login_invalido_mostra_erro_no_formulario() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = novo_cliente();

    let resp = client
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "admin"), ("password", "senha-errada")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Usuário ou senha inválidos."));
}

#[tokio::test]
async fn http_sem_sessao_redireciona_para_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = novo_cliente();

    let resp = client
        .get(format!("{}/painel/alunos", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn http_secao_desconhecida_redireciona_sem_erro() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let resp = client
        .get(format!("{}/painel/nao-existe", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(
        resp.status().is_redirection(),
        "seção desconhecida deveria redirecionar, não {}",
        resp.status()
    );
}

#[tokio::test]
async fn http_ciclo_de_vida_do_aluno() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let aluno_id = criar_aluno(&client, &server.base_url, "Teste Ciclo Vida").await;

    // Edição muda a graduação
    let resp = client
        .post(format!(
            "{}/painel/alunos/editar/{aluno_id}",
            server.base_url
        ))
        .form(&[
            ("nome_completo", "Teste Ciclo Vida"),
            ("tipo", "Adulto"),
            ("data_nascimento", "1998-04-10"),
            ("data_matricula", "2026-01-10"),
            ("status", "Ativo"),
            ("graduacao_atual", "Azul"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let lista = client
        .get(format!("{}/painel/alunos", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let inicio = lista.find("Teste Ciclo Vida").unwrap();
    assert!(lista[inicio..inicio + 600].contains("Azul"));

    // Exclusão remove da listagem
    let resp = client
        .post(format!(
            "{}/painel/alunos/excluir/{aluno_id}",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let lista = client
        .get(format!("{}/painel/alunos", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!lista.contains("Teste Ciclo Vida"));
}

#[tokio::test]
async fn http_registrar_presenca_de_novo_substitui_o_estado() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let aluno_id = criar_aluno(&client, &server.base_url, "Teste Presenca Upsert").await;
    let data = "2026-02-02";

    let resp = client
        .post(format!("{}/painel/presencas/registrar", server.base_url))
        .form(&[
            ("aluno_id", aluno_id.to_string().as_str()),
            ("data", data),
            ("presente", "1"),
            ("justificativa", ""),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    // Mesmo aluno, mesma data: o segundo registro vence
    let resp = client
        .post(format!("{}/painel/presencas/registrar", server.base_url))
        .form(&[
            ("aluno_id", aluno_id.to_string().as_str()),
            ("data", data),
            ("presente", "0"),
            ("justificativa", "Consulta médica"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let pagina = client
        .get(format!(
            "{}/painel/presencas?data={data}",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    // A folha de chamada oferece o campo de justificativa por linha
    assert!(pagina.contains("name=\"justificativa\""));

    // O nome aparece primeiro na folha de chamada; o registro revisado
    // fica na tabela do histórico, mais abaixo
    let historico = &pagina[pagina.find("Histórico").unwrap()..];
    let inicio = historico.find("Teste Presenca Upsert").unwrap();
    let trecho = &historico[inicio..(inicio + 800).min(historico.len())];
    assert!(trecho.contains("Consulta médica"));
}

#[tokio::test]
async fn http_erro_de_edicao_reaparece_no_formulario() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let aluno_id = criar_aluno(&client, &server.base_url, "Teste Erro Edicao").await;
    let resp = client
        .post(format!("{}/painel/avaliacoes/novo", server.base_url))
        .form(&[
            ("aluno_id", aluno_id.to_string().as_str()),
            ("data_avaliacao", "2026-04-04"),
            ("disciplina", "8"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let lista = client
        .get(format!("{}/painel/avaliacoes", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let avaliacao_id = id_depois_de(&lista, "Teste Erro Edicao", "avaliacoes/editar/");

    // Nota fora da escala: o redirect volta ao formulário com a mensagem
    let resp = client
        .post(format!(
            "{}/painel/avaliacoes/editar/{avaliacao_id}",
            server.base_url
        ))
        .form(&[
            ("aluno_id", aluno_id.to_string().as_str()),
            ("data_avaliacao", "2026-04-04"),
            ("disciplina", "15"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    let destino = location(&resp);
    assert!(destino.contains(&format!("avaliacoes/editar/{avaliacao_id}")));
    assert!(destino.contains("error="));

    let formulario = client
        .get(format!("{}{destino}", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(formulario.contains("Notas devem estar entre 0 e 10"));
    // Valores persistidos continuam intactos
    assert!(formulario.contains("2026-04-04"));
}

#[tokio::test]
async fn http_referer_externo_nao_e_seguido() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let resp = client
        .get(format!("{}/painel/nao-existe", server.base_url))
        .header("Referer", "https://evil.example/phishing")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/painel/dashboard");
}

#[tokio::test]
async fn http_avaliacao_so_aparece_no_portal_depois_de_liberada() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let admin = cliente_logado(&server.base_url, "admin", "admin123").await;

    let aluno_id = criar_aluno(&admin, &server.base_url, "Teste Portal Avaliacao").await;

    // Login do portal para o aluno
    let resp = admin
        .post(format!("{}/painel/usuarios/novo", server.base_url))
        .form(&[
            ("username", "aluno.portal"),
            ("password", "portal123"),
            ("perfil", "aluno"),
            ("nome", "Teste Portal Avaliacao"),
            ("aluno_id", aluno_id.to_string().as_str()),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    // Rascunho criado pelo sensei
    let resp = admin
        .post(format!("{}/painel/avaliacoes/novo", server.base_url))
        .form(&[
            ("aluno_id", aluno_id.to_string().as_str()),
            ("data_avaliacao", "2026-03-03"),
            ("disciplina", "9"),
            ("tecnica", "8"),
            ("participacao", "10"),
            ("respeito_comportamento", "9"),
            ("observacoes", "Evoluiu bem no período."),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    // Antes da liberação o aluno não vê nada
    let aluno = cliente_logado(&server.base_url, "aluno.portal", "portal123").await;
    let portal = aluno
        .get(format!("{}/portal/avaliacoes", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!portal.contains("2026-03-03"));

    // Liberação pelo painel
    let lista = admin
        .get(format!("{}/painel/avaliacoes", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let avaliacao_id = id_depois_de(&lista, "Teste Portal Avaliacao", "avaliacoes/liberar/");
    let resp = admin
        .post(format!(
            "{}/painel/avaliacoes/liberar/{avaliacao_id}",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let portal = aluno
        .get(format!("{}/portal/avaliacoes", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(portal.contains("2026-03-03"));
    assert!(portal.contains("Evoluiu bem no período."));
}

#[tokio::test]
async fn http_api_frequencia_devolve_json() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let resp = client
        .get(format!("{}/api/dashboard/frequencia", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let corpo: serde_json::Value = resp.json().await.unwrap();
    assert!(corpo["frequencias"].is_array());
}

#[tokio::test]
async fn http_template_csv_disponivel_para_download() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let resp = client
        .get(format!("{}/painel/alunos/template.csv", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tipo = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(tipo.starts_with("text/csv"));
    let corpo = resp.text().await.unwrap();
    assert!(corpo.starts_with("Nome,"));
    assert!(corpo.contains("João Silva"));
}

#[tokio::test]
async fn http_importacao_csv_cria_alunos_e_relata_erros() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = cliente_logado(&server.base_url, "admin", "admin123").await;

    let csv = "Nome Completo,Tipo,Graduação,Data de Matrícula\n\
               Aluno Importado Csv,Adulto,Azul,15/01/2026\n\
               ,Adulto,Branca,15/01/2026\n";
    let parte = reqwest::multipart::Part::bytes(csv.as_bytes().to_vec())
        .file_name("alunos.csv")
        .mime_str("text/csv")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("arquivo", parte);

    let resp = client
        .post(format!("{}/painel/alunos/importar", server.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let relatorio = resp.text().await.unwrap();
    assert!(relatorio.contains("Aluno Importado Csv"));

    let lista = client
        .get(format!("{}/painel/alunos", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let inicio = lista.find("Aluno Importado Csv").unwrap();
    assert!(lista[inicio..inicio + 600].contains("Azul"));
}

#[tokio::test]
async fn http_aluno_nao_acessa_o_painel_administrativo() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let admin = cliente_logado(&server.base_url, "admin", "admin123").await;

    let aluno_id = criar_aluno(&admin, &server.base_url, "Teste Sem Painel").await;
    let resp = admin
        .post(format!("{}/painel/usuarios/novo", server.base_url))
        .form(&[
            ("username", "aluno.restrito"),
            ("password", "restrito1"),
            ("perfil", "aluno"),
            ("nome", "Teste Sem Painel"),
            ("aluno_id", aluno_id.to_string().as_str()),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let aluno = cliente_logado(&server.base_url, "aluno.restrito", "restrito1").await;
    let resp = aluno
        .get(format!("{}/painel/alunos", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
